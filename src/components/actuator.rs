use crate::components::{ComponentBase, SignalProcessor};
use crate::document::Element;
use crate::functions::Parameter;
use crate::properties::{PropertyNode, PropertyStore};
use crate::resources::errors::Result;

/// Failure switches published under `<name>/malfunction/`.
#[derive(Debug, Clone)]
struct ActuatorFailures {
    zero: PropertyNode,
    hardover: PropertyNode,
    stuck: PropertyNode,
}

/// Models a servo between command and surface.
///
/// Stages apply in order: failures, lag, rate limit, deadband, hysteresis,
/// bias, then clipping. `<name>/saturated` is set while the output sits on a
/// non-zero clip limit.
#[derive(Debug, Clone)]
pub struct Actuator {
    base: ComponentBase,
    lag: Option<Parameter>,
    rate_limit_incr: Option<Parameter>,
    rate_limit_decr: Option<Parameter>,
    deadband_width: f64,
    hysteresis_width: f64,
    bias: f64,
    failures: ActuatorFailures,
    saturated: PropertyNode,
    initialized: bool,
    prev_lag_input: f64,
    prev_lag_output: f64,
    prev_rate_output: f64,
    prev_hyst_output: f64,
    prev_output: f64,
}

impl Actuator {
    pub fn from_element(element: &Element, store: &dyn PropertyStore) -> Result<Self> {
        let base = ComponentBase::with_input(element, store)?;

        let mut rate_limit_incr = None;
        let mut rate_limit_decr = None;
        for limit in element.find_elements("rate_limit") {
            let value = Parameter::from_element(limit, store)?;
            match limit.attribute("sense") {
                Some(sense) if sense.starts_with("incr") => rate_limit_incr = Some(value),
                Some(sense) if sense.starts_with("decr") => rate_limit_decr = Some(value),
                _ => {
                    rate_limit_incr = Some(value.clone());
                    rate_limit_decr = Some(value);
                }
            }
        }

        let failures = ActuatorFailures {
            zero: base.child_node(store, "malfunction/fail_zero")?,
            hardover: base.child_node(store, "malfunction/fail_hardover")?,
            stuck: base.child_node(store, "malfunction/fail_stuck")?,
        };
        let saturated = base.child_node(store, "saturated")?;

        Ok(Self {
            lag: Parameter::from_child(element, "lag", store)?,
            rate_limit_incr,
            rate_limit_decr,
            deadband_width: element.number_or("deadband_width", 0.0)?.abs(),
            hysteresis_width: element.number_or("hysteresis_width", 0.0)?.abs(),
            bias: element.number_or("bias", 0.0)?,
            failures,
            saturated,
            initialized: false,
            prev_lag_input: 0.0,
            prev_lag_output: 0.0,
            prev_rate_output: 0.0,
            prev_hyst_output: 0.0,
            prev_output: 0.0,
            base,
        })
    }

    pub fn is_saturated(&self) -> bool {
        self.saturated.get_bool()
    }

    fn lag(&mut self, value: f64, dt: f64) -> f64 {
        let c = self.lag.as_ref().map_or(0.0, Parameter::value);
        let output = if self.initialized && c != 0.0 {
            let denom = 2.0 + dt * c;
            let ca = dt * c / denom;
            let cb = (2.0 - dt * c) / denom;
            ca * (value + self.prev_lag_input) + self.prev_lag_output * cb
        } else {
            value
        };
        self.prev_lag_input = value;
        self.prev_lag_output = output;
        output
    }

    fn rate_limit(&mut self, value: f64, dt: f64) -> f64 {
        let mut output = value;
        if self.initialized {
            let delta = value - self.prev_rate_output;
            if let Some(incr) = &self.rate_limit_incr {
                let max_step = incr.value().abs() * dt;
                if delta > max_step {
                    output = self.prev_rate_output + max_step;
                }
            }
            if let Some(decr) = &self.rate_limit_decr {
                let max_step = decr.value().abs() * dt;
                if delta < -max_step {
                    output = self.prev_rate_output - max_step;
                }
            }
        }
        self.prev_rate_output = output;
        output
    }

    fn deadband(&self, value: f64) -> f64 {
        let half = self.deadband_width / 2.0;
        if value < -half {
            value + half
        } else if value > half {
            value - half
        } else {
            0.0
        }
    }

    fn hysteresis(&mut self, value: f64) -> f64 {
        let half = 0.5 * self.hysteresis_width;
        let mut output = value;
        if self.initialized {
            if value > self.prev_hyst_output {
                output = self.prev_hyst_output.max(value - half);
            } else if value < self.prev_hyst_output {
                output = self.prev_hyst_output.min(value + half);
            }
        }
        self.prev_hyst_output = output;
        output
    }
}

impl SignalProcessor for Actuator {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn run(&mut self, dt: f64) {
        let mut value = self.base.read_input();

        if self.failures.zero.get_bool() {
            value = 0.0;
        }
        if self.failures.hardover.get_bool() {
            value = match self.base.clip() {
                Some(clip) if value < 0.0 => clip.min.value(),
                Some(clip) => clip.max.value(),
                None => value,
            };
        }

        if !self.initialized {
            self.prev_lag_input = value;
            self.prev_lag_output = value;
            self.prev_rate_output = value;
            self.prev_hyst_output = value;
        }

        if self.lag.is_some() {
            value = self.lag(value, dt);
        }
        if self.rate_limit_incr.is_some() || self.rate_limit_decr.is_some() {
            value = self.rate_limit(value, dt);
        }
        if self.deadband_width != 0.0 {
            value = self.deadband(value);
        }
        if self.hysteresis_width != 0.0 {
            value = self.hysteresis(value);
        }
        value += self.bias;

        if self.failures.stuck.get_bool() && self.initialized {
            value = self.prev_output;
        }
        self.initialized = true;
        self.prev_output = value;

        self.base.output = value;
        self.base.finish();

        let output = self.base.output;
        let saturated = self.base.clip().is_some_and(|clip| {
            let (min, max) = (clip.min.value(), clip.max.value());
            (max != 0.0 && output >= max) || (min != 0.0 && output <= min)
        });
        self.saturated.set_bool(saturated);
    }

    fn reset(&mut self) {
        self.initialized = false;
    }

    fn input_paths(&self) -> Vec<String> {
        let mut paths = self.base.input_paths();
        for param in [&self.lag, &self.rate_limit_incr, &self.rate_limit_decr]
            .into_iter()
            .flatten()
        {
            paths.extend(param.path().map(str::to_string));
        }
        paths
    }
}
