//! Layout fixtures for tests.
//!
//! Geometry is copied from the shipped job files so tests exercise realistic
//! rectangle sizes and overlaps.

use panel_common::Rect;

/// Canvas used by the end-to-end geometry tests.
pub const CANVAS_SIZE: (u32, u32) = (4000, 3000);

/// ECMWF-WRF panel of the two-day job.
pub mod ecmwf_two_day {
    use super::Rect;

    pub const LAYOUT: Rect = Rect {
        x: 1192.5,
        y: 566.2,
        width: 952.6,
        height: 1639.3,
    };

    pub const MASKS: [Rect; 3] = [
        Rect { x: 1195.8, y: 566.2, width: 415.4, height: 139.5 },
        Rect { x: 1195.8, y: 2055.2, width: 230.2, height: 150.2 },
        Rect { x: 2046.9, y: 1371.2, width: 98.1, height: 834.2 },
    ];
}

/// GFS-FNV3 panel of the two-day job, the only one with a keep-region.
pub mod gfs_two_day {
    use super::Rect;

    pub const LAYOUT: Rect = Rect {
        x: 1990.8,
        y: 472.8,
        width: 1318.2,
        height: 1721.6,
    };

    pub const KEEP_REGION: Rect = Rect {
        x: 2285.0,
        y: 529.9,
        width: 1024.0,
        height: 1664.5,
    };

    pub const MASKS: [Rect; 3] = [
        Rect { x: 2285.0, y: 544.1, width: 309.5, height: 57.1 },
        Rect { x: 2285.0, y: 1997.7, width: 236.1, height: 196.7 },
        Rect { x: 3165.4, y: 1136.9, width: 143.5, height: 1057.5 },
    ];
}
