//! Default value functions for serde deserialization.

pub fn information_weight() -> f32 {
    1.0
}

pub fn sensor_range() -> f32 {
    100.0
}

pub fn cone_angle_deg() -> f32 {
    60.0
}

pub fn num_rays() -> usize {
    1000
}
