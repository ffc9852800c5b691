//! Column names as constants for type safety

/// Row label inside the per-image partition, kept when rows are renumbered
pub const INDEX: &str = "index";
/// Stage position X (`PositionX`)
pub const X: &str = "X";
/// Stage position Y (`PositionY`)
pub const Y: &str = "Y";
/// Stage position Z (`PositionZ`)
pub const Z: &str = "Z";
/// Seconds since the image acquisition started (`DeltaT`)
pub const T: &str = "T";
/// Channel index (`TheC`)
pub const C_INDEX: &str = "C_index";
/// Time point index (`TheT`)
pub const T_INDEX: &str = "T_index";
/// Z slice index (`TheZ`)
pub const Z_INDEX: &str = "Z_index";
/// Zero-based image (tile/series) index
pub const IMAGE: &str = "image";
/// Zero-based plane index within the image
pub const PLANE: &str = "plane";
/// Acquisition timestamp of the image
pub const IMAGE_ACQUISITION_T: &str = "image_acquisition_T";
/// `image_acquisition_T + T`
pub const ABSOLUTE_T: &str = "absolute_T";

/// All columns in table order
pub const ALL: [&str; 12] = [
    INDEX,
    X,
    Y,
    Z,
    T,
    C_INDEX,
    T_INDEX,
    Z_INDEX,
    IMAGE,
    PLANE,
    IMAGE_ACQUISITION_T,
    ABSOLUTE_T,
];

/// `Plane` attributes read for each row, in record order
pub const PLANE_KEYS: [&str; 7] = [
    "@PositionX",
    "@PositionY",
    "@PositionZ",
    "@DeltaT",
    "@TheC",
    "@TheT",
    "@TheZ",
];
