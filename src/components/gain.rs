use crate::components::{ComponentBase, SignalProcessor};
use crate::document::Element;
use crate::functions::{Parameter, Table};
use crate::properties::PropertyStore;
use crate::resources::errors::{FcsError, Result};

#[derive(Debug, Clone)]
enum GainType {
    Pure,
    Scheduled(Box<Table>),
    AerosurfaceScale {
        domain: (f64, f64),
        range: (f64, f64),
        zero_centered: bool,
    },
}

/// `pure_gain`, `scheduled_gain` and `aerosurface_scale`.
#[derive(Debug, Clone)]
pub struct Gain {
    base: ComponentBase,
    gain: Parameter,
    gain_type: GainType,
}

fn min_max(element: &Element, tag: &str, default: (f64, f64)) -> Result<(f64, f64)> {
    match element.find_element(tag) {
        Some(limits) => Ok((
            limits.number_or("min", default.0)?,
            limits.number_or("max", default.1)?,
        )),
        None => Ok(default),
    }
}

impl Gain {
    pub fn from_element(element: &Element, store: &dyn PropertyStore) -> Result<Self> {
        let base = ComponentBase::with_input(element, store)?;
        let gain = Parameter::from_child_or(element, "gain", 1.0, store)?;

        let gain_type = match element.name() {
            "pure_gain" => GainType::Pure,
            "scheduled_gain" => {
                let table = element
                    .find_element("table")
                    .ok_or_else(|| FcsError::missing(element.name(), "table"))?;
                GainType::Scheduled(Box::new(Table::from_element(table, store)?))
            }
            "aerosurface_scale" => {
                if element.find_element("range").is_none() {
                    return Err(FcsError::missing(element.name(), "range"));
                }
                let zero_centered = element
                    .find_element_value("zero_centered")
                    .map_or(true, |flag| !matches!(flag, "0" | "false" | "FALSE"));
                GainType::AerosurfaceScale {
                    domain: min_max(element, "domain", (-1.0, 1.0))?,
                    range: min_max(element, "range", (0.0, 0.0))?,
                    zero_centered,
                }
            }
            other => return Err(FcsError::UnknownComponentKind(other.to_string())),
        };

        Ok(Self {
            base,
            gain,
            gain_type,
        })
    }
}

impl SignalProcessor for Gain {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn run(&mut self, _dt: f64) {
        let input = self.base.read_input();
        let gain = self.gain.value();

        self.base.output = match &self.gain_type {
            GainType::Pure => gain * input,
            GainType::Scheduled(table) => gain * table.value() * input,
            GainType::AerosurfaceScale {
                domain: (in_min, in_max),
                range: (out_min, out_max),
                zero_centered,
            } => {
                let scaled = if *zero_centered {
                    if input == 0.0 {
                        0.0
                    } else if input > 0.0 {
                        if *in_max != 0.0 {
                            input / in_max * out_max
                        } else {
                            0.0
                        }
                    } else if *in_min != 0.0 {
                        input / in_min * out_min
                    } else {
                        0.0
                    }
                } else if in_max != in_min {
                    out_min + (input - in_min) / (in_max - in_min) * (out_max - out_min)
                } else {
                    *out_min
                };
                scaled * gain
            }
        };
        self.base.finish();
    }

    fn input_paths(&self) -> Vec<String> {
        let mut paths = self.base.input_paths();
        paths.extend(self.gain.path().map(str::to_string));
        if let GainType::Scheduled(table) = &self.gain_type {
            paths.extend(table.property_paths());
        }
        paths
    }
}
