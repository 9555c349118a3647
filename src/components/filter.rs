use crate::components::{ComponentBase, SignalProcessor};
use crate::document::Element;
use crate::functions::Parameter;
use crate::properties::PropertyStore;
use crate::resources::errors::{FcsError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    Lag,
    LeadLag,
    Washout,
    SecondOrder,
    Integrator,
}

impl FilterType {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "lag_filter" => Some(FilterType::Lag),
            "lead_lag_filter" => Some(FilterType::LeadLag),
            "washout_filter" => Some(FilterType::Washout),
            "second_order_filter" => Some(FilterType::SecondOrder),
            "integrator" => Some(FilterType::Integrator),
            _ => None,
        }
    }
}

/// Tustin-discretized linear filters and a triggerable integrator.
///
/// Coefficients `c1`..`c6` are numbers or properties and are re-read every
/// step, so scheduled filters work without reloading.
#[derive(Debug, Clone)]
pub struct Filter {
    base: ComponentBase,
    filter_type: FilterType,
    c: [Parameter; 6],
    trigger: Option<Parameter>,
    initialize: bool,
    prev_input: [f64; 2],
    prev_output: [f64; 2],
}

impl Filter {
    pub fn from_element(element: &Element, store: &dyn PropertyStore) -> Result<Self> {
        let filter_type = FilterType::from_tag(element.name())
            .ok_or_else(|| FcsError::UnknownComponentKind(element.name().to_string()))?;
        let base = ComponentBase::with_input(element, store)?;

        let coefficient = |tag: &str| Parameter::from_child_or(element, tag, 0.0, store);
        let c = [
            coefficient("c1")?,
            coefficient("c2")?,
            coefficient("c3")?,
            coefficient("c4")?,
            coefficient("c5")?,
            coefficient("c6")?,
        ];
        let required: &[&str] = match filter_type {
            FilterType::Lag | FilterType::Washout | FilterType::Integrator => &["c1"],
            FilterType::LeadLag => &["c1", "c2", "c3", "c4"],
            FilterType::SecondOrder => &["c4", "c5", "c6"],
        };
        if let Some(tag) = required.iter().find(|tag| element.find_element(tag).is_none()) {
            return Err(FcsError::missing(element.name(), tag));
        }

        Ok(Self {
            base,
            filter_type,
            c,
            trigger: Parameter::from_child(element, "trigger", store)?,
            initialize: true,
            prev_input: [0.0; 2],
            prev_output: [0.0; 2],
        })
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    fn step(&self, input: f64, dt: f64) -> f64 {
        let [c1, c2, c3, c4, c5, c6] = [
            self.c[0].value(),
            self.c[1].value(),
            self.c[2].value(),
            self.c[3].value(),
            self.c[4].value(),
            self.c[5].value(),
        ];
        let [pi1, pi2] = self.prev_input;
        let [po1, po2] = self.prev_output;

        match self.filter_type {
            FilterType::Lag => {
                let denom = 2.0 + dt * c1;
                let ca = dt * c1 / denom;
                let cb = (2.0 - dt * c1) / denom;
                (input + pi1) * ca + po1 * cb
            }
            FilterType::LeadLag => {
                let denom = 2.0 * c3 + dt * c4;
                let ca = (2.0 * c1 + dt * c2) / denom;
                let cb = (dt * c2 - 2.0 * c1) / denom;
                let cc = (2.0 * c3 - dt * c4) / denom;
                input * ca + pi1 * cb + po1 * cc
            }
            FilterType::Washout => {
                let denom = 2.0 + dt * c1;
                let ca = 2.0 / denom;
                let cb = (2.0 - dt * c1) / denom;
                (input - pi1) * ca + po1 * cb
            }
            FilterType::SecondOrder => {
                let dt2 = dt * dt;
                let denom = 4.0 * c4 + 2.0 * c5 * dt + c6 * dt2;
                let ca = (4.0 * c1 + 2.0 * c2 * dt + c3 * dt2) / denom;
                let cb = (2.0 * c3 * dt2 - 8.0 * c1) / denom;
                let cc = (4.0 * c1 - 2.0 * c2 * dt + c3 * dt2) / denom;
                let cd = (2.0 * c6 * dt2 - 8.0 * c4) / denom;
                let ce = (4.0 * c4 - 2.0 * c5 * dt + c6 * dt2) / denom;
                input * ca + pi1 * cb + pi2 * cc - po1 * cd - po2 * ce
            }
            FilterType::Integrator => {
                let ca = dt * c1 / 2.0;
                (input + pi1) * ca + po1
            }
        }
    }
}

impl SignalProcessor for Filter {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn run(&mut self, dt: f64) {
        let mut input = self.base.read_input();

        if self.initialize && self.filter_type != FilterType::Integrator {
            self.prev_input = [input; 2];
            self.prev_output = [input; 2];
            self.base.output = input;
            self.initialize = false;
        } else {
            let triggered = self
                .trigger
                .as_ref()
                .is_some_and(|trigger| trigger.value().abs() > 1e-6);
            if self.filter_type == FilterType::Integrator && triggered {
                input = 0.0;
                self.prev_input = [0.0; 2];
                self.prev_output = [0.0; 2];
            }
            let output = self.step(input, dt);
            self.base.output = if output.is_finite() { output } else { 0.0 };
            self.initialize = false;
        }

        self.prev_input = [input, self.prev_input[0]];
        self.prev_output = [self.base.output, self.prev_output[0]];
        self.base.finish();
    }

    fn reset(&mut self) {
        self.initialize = true;
        self.prev_input = [0.0; 2];
        self.prev_output = [0.0; 2];
    }
}
