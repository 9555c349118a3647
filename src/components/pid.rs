use crate::components::{ComponentBase, SignalProcessor};
use crate::document::Element;
use crate::functions::Parameter;
use crate::properties::PropertyStore;
use crate::resources::errors::{FcsError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Integration {
    None,
    RectEuler,
    Trapezoidal,
    AdamsBashforth2,
    AdamsBashforth3,
}

impl Integration {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "none" => Some(Integration::None),
            "rect" => Some(Integration::RectEuler),
            "trap" => Some(Integration::Trapezoidal),
            "ab2" => Some(Integration::AdamsBashforth2),
            "ab3" => Some(Integration::AdamsBashforth3),
            _ => None,
        }
    }
}

/// Proportional-integral-derivative controller.
///
/// The ideal form is `kp*e + ki*∫e + kd*ė`; `type="standard"` gives
/// `kp*(e + ki*∫e + kd*ė)`. A positive `trigger` freezes the integrator
/// (anti-windup) and a negative one clears it.
#[derive(Debug, Clone)]
pub struct Pid {
    base: ComponentBase,
    kp: Parameter,
    ki: Parameter,
    kd: Parameter,
    trigger: Option<Parameter>,
    standard: bool,
    integration: Integration,
    integral: f64,
    prev_input: f64,
    prev_input2: f64,
}

impl Pid {
    pub fn from_element(element: &Element, store: &dyn PropertyStore) -> Result<Self> {
        let base = ComponentBase::with_input(element, store)?;

        let integration = match element.find_element("ki") {
            Some(ki) => {
                let scheme = ki.attribute_or("type", "rect");
                Integration::parse(scheme).ok_or_else(|| {
                    FcsError::StructuralConfig(format!(
                        "unknown integration scheme '{}' in {}",
                        scheme,
                        element.describe()
                    ))
                })?
            }
            None => Integration::RectEuler,
        };

        Ok(Self {
            base,
            kp: Parameter::from_child_or(element, "kp", 0.0, store)?,
            ki: Parameter::from_child_or(element, "ki", 0.0, store)?,
            kd: Parameter::from_child_or(element, "kd", 0.0, store)?,
            trigger: Parameter::from_child(element, "trigger", store)?,
            standard: element.attribute("type") == Some("standard"),
            integration,
            integral: 0.0,
            prev_input: 0.0,
            prev_input2: 0.0,
        })
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }
}

impl SignalProcessor for Pid {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn run(&mut self, dt: f64) {
        let input = self.base.read_input();
        let derivative = if dt > 0.0 {
            (input - self.prev_input) / dt
        } else {
            0.0
        };

        let trigger = self.trigger.as_ref().map_or(0.0, Parameter::value);
        if trigger.abs() < 1e-6 {
            let delta = match self.integration {
                Integration::None => 0.0,
                Integration::RectEuler => input,
                Integration::Trapezoidal => 0.5 * (input + self.prev_input),
                Integration::AdamsBashforth2 => 1.5 * input - 0.5 * self.prev_input,
                Integration::AdamsBashforth3 => {
                    (23.0 * input - 16.0 * self.prev_input + 5.0 * self.prev_input2) / 12.0
                }
            };
            self.integral += self.ki.value() * dt * delta;
        } else if trigger < 0.0 {
            self.integral = 0.0;
        }

        let (kp, kd) = (self.kp.value(), self.kd.value());
        self.base.output = if self.standard {
            kp * (input + self.integral + kd * derivative)
        } else {
            kp * input + self.integral + kd * derivative
        };

        self.prev_input2 = if trigger < 0.0 { 0.0 } else { self.prev_input };
        self.prev_input = input;
        self.base.finish();
    }

    fn reset(&mut self) {
        self.integral = 0.0;
        self.prev_input = 0.0;
        self.prev_input2 = 0.0;
    }

    fn input_paths(&self) -> Vec<String> {
        let mut paths = self.base.input_paths();
        for gain in [&self.kp, &self.ki, &self.kd] {
            paths.extend(gain.path().map(str::to_string));
        }
        paths
    }
}
