use std::sync::{Arc, PoisonError, RwLock};

use crate::properties::{AtomicF64, PropertyNode, PropertyStore};
use crate::utils::{DEG_TO_RAD, RAD_TO_DEG};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleUnit {
    Radians,
    Degrees,
}

/// An angle tagged with its unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Angle {
    pub value: f64,
    pub unit: AngleUnit,
}

impl Angle {
    pub fn radians(value: f64) -> Self {
        Self {
            value,
            unit: AngleUnit::Radians,
        }
    }

    pub fn degrees(value: f64) -> Self {
        Self {
            value,
            unit: AngleUnit::Degrees,
        }
    }

    pub fn to_radians(self) -> f64 {
        match self.unit {
            AngleUnit::Radians => self.value,
            AngleUnit::Degrees => self.value * DEG_TO_RAD,
        }
    }

    pub fn to_degrees(self) -> f64 {
        match self.unit {
            AngleUnit::Radians => self.value * RAD_TO_DEG,
            AngleUnit::Degrees => self.value,
        }
    }
}

/// Representation written by a surface setter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetForm {
    Radians,
    Degrees,
    Normalized,
}

/// Representation read from a surface register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputForm {
    Radians,
    Degrees,
    Normalized,
    Magnitude,
}

#[derive(Debug, Default, Clone, Copy)]
struct SurfaceState {
    rad: f64,
    deg: f64,
    norm: f64,
}

/// A control-surface position held in radians, degrees and normalized
/// travel.
///
/// Radians and degrees are written together under one lock; the magnitude
/// is always `|radians|`. The normalized slot is independent.
#[derive(Debug, Clone, Default)]
pub struct SurfaceRegister(Arc<RwLock<SurfaceState>>);

impl SurfaceRegister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, form: SetForm, value: f64) {
        let mut state = self.0.write().unwrap_or_else(PoisonError::into_inner);
        match form {
            SetForm::Radians => {
                state.rad = value;
                state.deg = value * RAD_TO_DEG;
            }
            SetForm::Degrees => {
                state.deg = value;
                state.rad = value * DEG_TO_RAD;
            }
            SetForm::Normalized => state.norm = value,
        }
    }

    pub fn set_angle(&self, angle: Angle) {
        match angle.unit {
            AngleUnit::Radians => self.set(SetForm::Radians, angle.value),
            AngleUnit::Degrees => self.set(SetForm::Degrees, angle.value),
        }
    }

    pub fn get(&self, form: OutputForm) -> f64 {
        let state = *self.0.read().unwrap_or_else(PoisonError::into_inner);
        match form {
            OutputForm::Radians => state.rad,
            OutputForm::Degrees => state.deg,
            OutputForm::Normalized => state.norm,
            OutputForm::Magnitude => state.rad.abs(),
        }
    }

    pub fn angle(&self) -> Angle {
        Angle::radians(self.get(OutputForm::Radians))
    }

    pub fn clear(&self) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = SurfaceState::default();
    }

    /// Ties `fcs/<prefix>-pos-{rad,deg,norm}` and, optionally, the read-only
    /// `fcs/mag-<prefix>-pos-rad`.
    pub fn tie(&self, store: &dyn PropertyStore, prefix: &str, magnitude: bool) {
        let forms = [
            ("rad", SetForm::Radians, OutputForm::Radians),
            ("deg", SetForm::Degrees, OutputForm::Degrees),
            ("norm", SetForm::Normalized, OutputForm::Normalized),
        ];
        for (suffix, set_form, get_form) in forms {
            let read = self.clone();
            let write = self.clone();
            store.tie(
                &format!("fcs/{}-pos-{}", prefix, suffix),
                Arc::new(move || read.get(get_form)),
                Some(Arc::new(move |value| write.set(set_form, value))),
            );
        }
        if magnitude {
            let read = self.clone();
            store.tie(
                &format!("fcs/mag-{}-pos-rad", prefix),
                Arc::new(move || read.get(OutputForm::Magnitude)),
                None,
            );
        }
    }
}

/// A single scalar register shared with the property store.
#[derive(Debug, Clone, Default)]
pub struct ScalarRegister(Arc<AtomicF64>);

impl ScalarRegister {
    pub fn new(value: f64) -> Self {
        Self(Arc::new(AtomicF64::new(value)))
    }

    #[inline]
    pub fn get(&self) -> f64 {
        self.0.load()
    }

    #[inline]
    pub fn set(&self, value: f64) {
        self.0.store(value);
    }

    pub fn tie(&self, store: &dyn PropertyStore, path: &str) -> PropertyNode {
        let read = self.clone();
        let write = self.clone();
        store.tie(
            path,
            Arc::new(move || read.get()),
            Some(Arc::new(move |value| write.set(value))),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    LeftAileron,
    RightAileron,
    Elevator,
    Rudder,
    Flap,
    Speedbrake,
    Spoiler,
}

impl Surface {
    pub const ALL: [Surface; 7] = [
        Surface::LeftAileron,
        Surface::RightAileron,
        Surface::Elevator,
        Surface::Rudder,
        Surface::Flap,
        Surface::Speedbrake,
        Surface::Spoiler,
    ];

    /// Property prefix, as in `fcs/<prefix>-pos-rad`.
    pub fn prefix(self) -> &'static str {
        match self {
            Surface::LeftAileron => "left-aileron",
            Surface::RightAileron => "right-aileron",
            Surface::Elevator => "elevator",
            Surface::Rudder => "rudder",
            Surface::Flap => "flap",
            Surface::Speedbrake => "speedbrake",
            Surface::Spoiler => "spoiler",
        }
    }

    /// Flaps publish no magnitude property.
    pub fn has_magnitude(self) -> bool {
        self != Surface::Flap
    }
}

/// Scalar command and position registers owned by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    AileronCmd,
    ElevatorCmd,
    RudderCmd,
    FlapCmd,
    SpeedbrakeCmd,
    SpoilerCmd,
    PitchTrimCmd,
    RollTrimCmd,
    YawTrimCmd,
    SteerCmd,
    LeftBrakeCmd,
    RightBrakeCmd,
    CenterBrakeCmd,
    GearCmd,
    GearPos,
    TailhookPos,
    WingFoldPos,
}

impl Control {
    pub const ALL: [Control; 17] = [
        Control::AileronCmd,
        Control::ElevatorCmd,
        Control::RudderCmd,
        Control::FlapCmd,
        Control::SpeedbrakeCmd,
        Control::SpoilerCmd,
        Control::PitchTrimCmd,
        Control::RollTrimCmd,
        Control::YawTrimCmd,
        Control::SteerCmd,
        Control::LeftBrakeCmd,
        Control::RightBrakeCmd,
        Control::CenterBrakeCmd,
        Control::GearCmd,
        Control::GearPos,
        Control::TailhookPos,
        Control::WingFoldPos,
    ];

    pub fn property(self) -> &'static str {
        match self {
            Control::AileronCmd => "fcs/aileron-cmd-norm",
            Control::ElevatorCmd => "fcs/elevator-cmd-norm",
            Control::RudderCmd => "fcs/rudder-cmd-norm",
            Control::FlapCmd => "fcs/flap-cmd-norm",
            Control::SpeedbrakeCmd => "fcs/speedbrake-cmd-norm",
            Control::SpoilerCmd => "fcs/spoiler-cmd-norm",
            Control::PitchTrimCmd => "fcs/pitch-trim-cmd-norm",
            Control::RollTrimCmd => "fcs/roll-trim-cmd-norm",
            Control::YawTrimCmd => "fcs/yaw-trim-cmd-norm",
            Control::SteerCmd => "fcs/steer-cmd-norm",
            Control::LeftBrakeCmd => "fcs/left-brake-cmd-norm",
            Control::RightBrakeCmd => "fcs/right-brake-cmd-norm",
            Control::CenterBrakeCmd => "fcs/center-brake-cmd-norm",
            Control::GearCmd => "gear/gear-cmd-norm",
            Control::GearPos => "gear/gear-pos-norm",
            Control::TailhookPos => "gear/tailhook-pos-norm",
            Control::WingFoldPos => "fcs/wing-fold-pos-norm",
        }
    }
}

/// Brake groups a landing-gear unit can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrakeGroup {
    #[default]
    None,
    Left,
    Right,
    Center,
    Nose,
    Tail,
}
