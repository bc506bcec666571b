use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::Parser;

use pdf_calculator::{evaluate_stream, CalculatorOptions, TruncatedInputPolicy, Value};

/// Evaluate a PDF type 4 (PostScript calculator) function
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Read the function body from this file. All positional arguments are
    /// then taken as inputs
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Fail on unknown operators, malformed numbers, and unmatched braces
    #[arg(long)]
    strict: bool,

    /// Fail if the body ends before every `{` is closed
    #[arg(long)]
    fail_on_truncated: bool,

    /// Operand stack limit. 0 disables the limit
    #[arg(long, default_value_t = CalculatorOptions::PDF_STACK_LIMIT)]
    max_stack_depth: usize,

    /// Maximum nesting of `{`, counting the function body
    #[arg(long, default_value_t = CalculatorOptions::NESTING_LIMIT)]
    max_nesting_depth: usize,

    /// The function body (unless `--file` is given), followed by the inputs
    #[arg(allow_hyphen_values = true)]
    args: Vec<String>,
}

impl Cli {
    fn options(&self) -> CalculatorOptions {
        let mut options = if self.strict {
            CalculatorOptions::strict()
        } else {
            CalculatorOptions::default()
        };

        if self.fail_on_truncated {
            options.on_truncated_input = TruncatedInputPolicy::Fail;
        }

        let max_stack_depth = match self.max_stack_depth {
            0 => None,
            n => Some(n),
        };

        options
            .with_max_stack_depth(max_stack_depth)
            .with_max_nesting_depth(self.max_nesting_depth)
    }

    fn program_and_inputs(&self) -> anyhow::Result<(Vec<u8>, &[String])> {
        match &self.file {
            Some(path) => {
                let program = fs::read(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;

                Ok((program, &self.args))
            }
            None => match self.args.split_first() {
                Some((program, inputs)) => Ok((program.clone().into_bytes(), inputs)),
                None => anyhow::bail!("expected a function body or --file"),
            },
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let options = cli.options();

    let (program, inputs) = cli.program_and_inputs()?;

    let inputs = inputs
        .iter()
        .map(|input| {
            input
                .parse::<f64>()
                .with_context(|| format!("invalid input {:?}", input))
        })
        .collect::<anyhow::Result<Vec<f64>>>()?;

    let stack = evaluate_stream(&program[..], &inputs, &options)?;

    let outputs = stack
        .as_slice()
        .iter()
        .map(|value| match value {
            Value::Number(n) => n.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Procedure(..) => "--procedure--".to_owned(),
        })
        .collect::<Vec<String>>();

    println!("{}", outputs.join(" "));

    Ok(())
}
