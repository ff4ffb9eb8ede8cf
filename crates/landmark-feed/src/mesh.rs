//! Face-mesh index conventions
//!
//! Indices follow the 468-point face mesh. "Left" and "right" are from the
//! subject's point of view on a mirrored image.

/// Number of points in a full face mesh
pub const FACE_MESH_LANDMARKS: usize = 468;

pub const LEFT_EYE_UPPER: usize = 386;
pub const LEFT_EYE_LOWER: usize = 374;
pub const RIGHT_EYE_UPPER: usize = 159;
pub const RIGHT_EYE_LOWER: usize = 145;
pub const UPPER_LIP: usize = 13;
pub const LOWER_LIP: usize = 14;

/// Left eye contour
pub const LEFT_EYE_CONTOUR: [usize; 16] = [
    362, 382, 381, 380, 374, 373, 390, 249, 263, 466, 388, 387, 386, 385, 384, 398,
];

/// Right eye contour
pub const RIGHT_EYE_CONTOUR: [usize; 16] = [
    33, 7, 163, 144, 145, 153, 154, 155, 133, 173, 157, 158, 159, 160, 161, 246,
];

/// Outer and inner lip contours
pub const LIPS_CONTOUR: [usize; 40] = [
    61, 146, 91, 181, 84, 17, 314, 405, 321, 375, 291, 308, 324, 318, 402, 317, 14, 87, 178, 88,
    95, 185, 40, 39, 37, 0, 267, 269, 270, 409, 415, 310, 311, 312, 13, 82, 81, 42, 183, 78,
];
