pub const RAD_TO_DEG: f64 = 180.0 / std::f64::consts::PI;
pub const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;
pub const INCH_TO_FT: f64 = 1.0 / 12.0;
pub const METER_TO_FT: f64 = 1.0 / 0.3048;

/// Gear is constructed in the down position.
pub const GEAR_DOWN: f64 = 1.0;

// Vehicle state published by the host flight model and consumed by the
// inertial sensor components.
pub const BODY_ACCEL_PROPERTIES: [&str; 3] = [
    "accelerations/a-body-x-ft_sec2",
    "accelerations/a-body-y-ft_sec2",
    "accelerations/a-body-z-ft_sec2",
];
pub const BODY_RATE_PROPERTIES: [&str; 3] = [
    "velocities/p-rad_sec",
    "velocities/q-rad_sec",
    "velocities/r-rad_sec",
];
pub const BODY_RATE_DOT_PROPERTIES: [&str; 3] = [
    "accelerations/pdot-rad_sec2",
    "accelerations/qdot-rad_sec2",
    "accelerations/rdot-rad_sec2",
];
pub const EULER_PROPERTIES: [&str; 3] = ["attitude/phi-rad", "attitude/theta-rad", "attitude/psi-rad"];
pub const MAGNETIC_FIELD_PROPERTIES: [&str; 3] = [
    "environment/magnetic-field-north-nT",
    "environment/magnetic-field-east-nT",
    "environment/magnetic-field-down-nT",
];
