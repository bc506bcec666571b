use crate::error::{PostScriptError, PostScriptResult};

use self::postscript_calculator::{evaluate_stream, CalculatorOptions};

pub mod postscript_calculator;

/// A type 4 function (PDF 1.3), also called a PostScript calculator function, shall be
/// represented as a stream containing code written in a small subset of the PostScript language.
///
/// The stream contents are expected to already be decoded
#[derive(Debug, Clone)]
pub struct Function {
    /// An array of 2 * m numbers, where m shall be the number of input values.
    /// For each i from 0 to m - 1, Domain2i shall be less than or equal to Domain2i+1,
    /// and the ith input value, xi, shall lie in the interval Domain2i <= xi <= Domain2i+1.
    /// Input values outside the declared domain shall be clipped to the nearest boundary
    /// value.
    domain: Vec<f64>,

    /// An array of 2 * n numbers, where n shall be the number of output values.
    ///
    /// Only the number of outputs is taken from this. Clipping outputs to the range
    /// is left to the caller
    range: Option<Vec<f64>>,

    program: Box<[u8]>,

    options: CalculatorOptions,
}

impl Function {
    pub fn new(
        program: impl Into<Box<[u8]>>,
        domain: Vec<f64>,
        range: Option<Vec<f64>>,
    ) -> PostScriptResult<Self> {
        assert_intervals(&domain)?;

        if let Some(range) = &range {
            assert_intervals(range)?;
        }

        Ok(Self {
            domain,
            range,
            program: program.into(),
            options: CalculatorOptions::default(),
        })
    }

    pub fn with_options(mut self, options: CalculatorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn input_count(&self) -> usize {
        self.domain.len() / 2
    }

    /// `None` if the function does not declare a range
    pub fn output_count(&self) -> Option<usize> {
        self.range.as_ref().map(|range| range.len() / 2)
    }

    pub fn domain(&self) -> &[f64] {
        &self.domain
    }

    pub fn range(&self) -> Option<&[f64]> {
        self.range.as_deref()
    }

    /// Clips `inputs` to the domain and runs the function body.
    ///
    /// With a declared range, the top n values of the stack are returned, bottom
    /// to top. Without one, the whole stack is returned
    pub fn evaluate(&self, inputs: &[f64]) -> PostScriptResult<Vec<f64>> {
        if inputs.len() != self.input_count() {
            anyhow::bail!(PostScriptError::RangeCheck);
        }

        let clipped = inputs
            .iter()
            .zip(self.domain.chunks_exact(2))
            .map(|(&x, bounds)| clip(x, bounds[0], bounds[1]))
            .collect::<Vec<f64>>();

        let stack = evaluate_stream(&*self.program, &clipped, &self.options)?;

        let mut outputs = stack.into_numbers()?;

        if let Some(n) = self.output_count() {
            if outputs.len() < n {
                anyhow::bail!(PostScriptError::StackUnderflow);
            }

            outputs.drain(..outputs.len() - n);
        }

        Ok(outputs)
    }
}

/// Pairs of `[min max]` with `min <= max`
fn assert_intervals(bounds: &[f64]) -> PostScriptResult<()> {
    if bounds.len() % 2 != 0 {
        anyhow::bail!(PostScriptError::RangeCheck);
    }

    for pair in bounds.chunks_exact(2) {
        // written this way round so that NaN bounds are rejected
        if !(pair[0] <= pair[1]) {
            anyhow::bail!(PostScriptError::RangeCheck);
        }
    }

    Ok(())
}

fn clip(x: f64, min: f64, max: f64) -> f64 {
    if x < min {
        min
    } else if x > max {
        max
    } else {
        x
    }
}
