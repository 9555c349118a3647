use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::components::{BuildContext, ComponentBase, SignalProcessor};
use crate::document::Element;
use crate::properties::PropertyNode;
use crate::resources::errors::{FcsError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseVariation {
    Percent,
    Absolute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseDistribution {
    Uniform,
    Gaussian,
}

#[derive(Debug, Clone, Copy)]
struct Noise {
    amplitude: f64,
    variation: NoiseVariation,
    distribution: NoiseDistribution,
}

#[derive(Debug, Clone)]
struct Quantization {
    min: f64,
    max: f64,
    granularity: f64,
    count: Option<PropertyNode>,
}

#[derive(Debug, Clone)]
struct SensorFailures {
    low: PropertyNode,
    high: PropertyNode,
    stuck: PropertyNode,
}

/// Signal degradation shared by the sensor family.
///
/// Applied in order: lag, noise, drift, gain, bias, failures, quantization.
/// Noise is drawn from a stream seeded by the component's property path, so
/// runs are reproducible.
#[derive(Debug, Clone)]
pub struct SensorModel {
    lag: f64,
    noise: Option<Noise>,
    drift_rate: f64,
    drift: f64,
    gain: f64,
    bias: f64,
    quantization: Option<Quantization>,
    failures: SensorFailures,
    rng: ChaCha8Rng,
    initialized: bool,
    prev_input: f64,
    prev_output: f64,
    quantized: i64,
}

impl SensorModel {
    pub fn from_element(
        element: &Element,
        base: &ComponentBase,
        ctx: &BuildContext<'_>,
    ) -> Result<Self> {
        let noise = element
            .find_element("noise")
            .map(|noise| -> Result<Noise> {
                let variation = match noise.attribute_or("variation", "ABSOLUTE") {
                    "PERCENT" | "percent" => NoiseVariation::Percent,
                    "ABSOLUTE" | "absolute" => NoiseVariation::Absolute,
                    other => {
                        return Err(FcsError::StructuralConfig(format!(
                            "unknown noise variation '{}'",
                            other
                        )))
                    }
                };
                let distribution = match noise.attribute_or("distribution", "UNIFORM") {
                    "UNIFORM" | "uniform" => NoiseDistribution::Uniform,
                    "GAUSSIAN" | "gaussian" => NoiseDistribution::Gaussian,
                    other => {
                        return Err(FcsError::StructuralConfig(format!(
                            "unknown noise distribution '{}'",
                            other
                        )))
                    }
                };
                Ok(Noise {
                    amplitude: noise.data_as_number()?,
                    variation,
                    distribution,
                })
            })
            .transpose()?;

        let quantization = element
            .find_element("quantization")
            .map(|quant| -> Result<Quantization> {
                let bits = quant.find_element_value_as_number("bits")?;
                if !(1.0..=52.0).contains(&bits) {
                    return Err(FcsError::StructuralConfig(format!(
                        "quantization bits must be between 1 and 52, got {}",
                        bits
                    )));
                }
                let min = quant.number_or("min", 0.0)?;
                let max = quant.number_or("max", 0.0)?;
                let divisions = (1u64 << bits as u32) as f64;
                let count = quant
                    .attribute("name")
                    .map(|name| {
                        ctx.store.get_node(name, true).ok_or_else(|| {
                            FcsError::StructuralConfig(format!("invalid quantization name '{}'", name))
                        })
                    })
                    .transpose()?;
                Ok(Quantization {
                    min,
                    max,
                    granularity: (max - min) / divisions,
                    count,
                })
            })
            .transpose()?;

        let failures = SensorFailures {
            low: base.child_node(ctx.store, "malfunction/fail_low")?,
            high: base.child_node(ctx.store, "malfunction/fail_high")?,
            stuck: base.child_node(ctx.store, "malfunction/fail_stuck")?,
        };

        Ok(Self {
            lag: element.number_or("lag", 0.0)?,
            noise,
            drift_rate: element.number_or("drift_rate", 0.0)?,
            drift: 0.0,
            gain: element.number_or("gain", 1.0)?,
            bias: element.number_or("bias", 0.0)?,
            quantization,
            failures,
            rng: ctx.rng.get_rng(base.property_path()),
            initialized: false,
            prev_input: 0.0,
            prev_output: 0.0,
            quantized: 0,
        })
    }

    /// Last quantized count, or 0 without quantization.
    pub fn quantized(&self) -> i64 {
        self.quantized
    }

    pub fn drift(&self) -> f64 {
        self.drift
    }

    fn gaussian(&mut self) -> f64 {
        // Box-Muller
        let u1: f64 = self.rng.gen_range(f64::MIN_POSITIVE..1.0);
        let u2: f64 = self.rng.gen();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }

    /// Degrades `input` into the sensor output for one step.
    pub fn process(&mut self, input: f64, dt: f64) -> f64 {
        if self.failures.stuck.get_bool() && self.initialized {
            return self.prev_output;
        }

        let mut output = input;
        if self.lag != 0.0 {
            if self.initialized {
                let denom = 2.0 + dt * self.lag;
                let ca = dt * self.lag / denom;
                let cb = (2.0 - dt * self.lag) / denom;
                output = ca * (input + self.prev_input) + self.prev_output * cb;
            }
            self.prev_input = input;
        }

        if let Some(noise) = self.noise {
            let random = match noise.distribution {
                NoiseDistribution::Uniform => 2.0 * (self.rng.gen::<f64>() - 0.5),
                NoiseDistribution::Gaussian => self.gaussian(),
            };
            output = match noise.variation {
                NoiseVariation::Percent => output * (1.0 + noise.amplitude * random),
                NoiseVariation::Absolute => output + noise.amplitude * random,
            };
        }

        if self.drift_rate != 0.0 {
            self.drift += self.drift_rate * dt;
            output += self.drift;
        }
        output = output * self.gain + self.bias;

        if self.failures.low.get_bool() {
            output = -f64::MAX;
        }
        if self.failures.high.get_bool() {
            output = f64::MAX;
        }

        if let Some(quant) = &self.quantization {
            if quant.granularity > 0.0 {
                let clamped = output.clamp(quant.min, quant.max);
                self.quantized = ((clamped - quant.min) / quant.granularity) as i64;
                output = self.quantized as f64 * quant.granularity + quant.min;
                if let Some(count) = &quant.count {
                    count.set(self.quantized as f64);
                }
            }
        }

        self.initialized = true;
        self.prev_output = output;
        output
    }

    pub fn reset(&mut self) {
        self.initialized = false;
        self.drift = 0.0;
        self.prev_input = 0.0;
        self.prev_output = 0.0;
    }
}

/// A generic sensor on one input property.
#[derive(Debug, Clone)]
pub struct Sensor {
    base: ComponentBase,
    model: SensorModel,
}

impl Sensor {
    pub fn from_element(element: &Element, ctx: &BuildContext<'_>) -> Result<Self> {
        let base = ComponentBase::with_input(element, ctx.store)?;
        let model = SensorModel::from_element(element, &base, ctx)?;
        Ok(Self { base, model })
    }

    pub fn model(&self) -> &SensorModel {
        &self.model
    }
}

impl SignalProcessor for Sensor {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn run(&mut self, dt: f64) {
        let input = self.base.read_input();
        self.base.output = self.model.process(input, dt);
        self.base.finish();
    }

    fn reset(&mut self) {
        self.model.reset();
    }
}
