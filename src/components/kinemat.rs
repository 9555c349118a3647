use crate::components::{ComponentBase, SignalProcessor};
use crate::document::Element;
use crate::properties::PropertyStore;
use crate::resources::errors::{FcsError, Result};
use crate::utils::equal_to_roundoff;

/// Moves the output through a list of detents at a per-segment rate.
///
/// The input is a normalized command scaled onto the last detent position,
/// unless `noscale` is present. Each `setting` gives a detent `position` and
/// the `time` it takes to travel to it from the previous detent; a zero time
/// means the segment is traversed instantly.
#[derive(Debug, Clone)]
pub struct Kinemat {
    base: ComponentBase,
    detents: Vec<f64>,
    transition_times: Vec<f64>,
    scale: bool,
}

impl Kinemat {
    pub fn from_element(element: &Element, store: &dyn PropertyStore) -> Result<Self> {
        let base = ComponentBase::with_input(element, store)?;
        let traverse = element
            .find_element("traverse")
            .ok_or_else(|| FcsError::missing(element.name(), "traverse"))?;

        let mut detents = Vec::new();
        let mut transition_times = Vec::new();
        for setting in traverse.find_elements("setting") {
            detents.push(setting.find_element_value_as_number("position")?);
            transition_times.push(setting.find_element_value_as_number("time")?.max(0.0));
        }
        if detents.len() < 2 {
            return Err(FcsError::StructuralConfig(format!(
                "{} needs at least two traverse settings",
                element.describe()
            )));
        }
        if detents.iter().any(|position| !position.is_finite()) {
            return Err(FcsError::StructuralConfig(format!(
                "{} detent positions must be finite",
                element.describe()
            )));
        }
        if detents.windows(2).any(|pair| pair[1] <= pair[0]) {
            return Err(FcsError::StructuralConfig(format!(
                "{} detent positions must be ascending",
                element.describe()
            )));
        }

        let mut kinemat = Self {
            base,
            detents,
            transition_times,
            scale: element.find_element("noscale").is_none(),
        };
        kinemat.base.output = kinemat.detents[0];
        Ok(kinemat)
    }

    fn travel(&self, target: f64, mut output: f64, mut dt: f64) -> f64 {
        let last = self.detents.len() - 1;
        while dt > 0.0 && !equal_to_roundoff(target, output) {
            // Segment [ind - 1, ind] that the output currently sits in.
            let mut ind = 1;
            while ind < last {
                let beyond = if target < output {
                    self.detents[ind] < output
                } else {
                    self.detents[ind] <= output
                };
                if !beyond {
                    break;
                }
                ind += 1;
            }

            let segment_time = self.transition_times[ind];
            if segment_time <= 0.0 {
                return target;
            }
            let rate = (self.detents[ind] - self.detents[ind - 1]) / segment_time;
            let segment_target = target.clamp(self.detents[ind - 1], self.detents[ind]);
            let needed = ((segment_target - output) / rate).abs();
            if dt < needed {
                if output < target {
                    output += dt * rate;
                } else {
                    output -= dt * rate;
                }
                dt = 0.0;
            } else {
                output = segment_target;
                dt -= needed;
            }
        }
        output
    }
}

impl SignalProcessor for Kinemat {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn run(&mut self, dt: f64) {
        let mut target = self.base.read_input();
        let (first, last) = (self.detents[0], self.detents[self.detents.len() - 1]);
        if self.scale {
            target *= last;
        }
        target = target.clamp(first, last);

        self.base.output = if dt <= 0.0 {
            target
        } else {
            self.travel(target, self.base.output, dt)
        };
        self.base.finish();
    }

    fn reset(&mut self) {
        self.base.output = self.detents[0];
    }
}
