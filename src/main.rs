use clap::{Parser, Subcommand}; // command line argument parser
use miette::{IntoDiagnostic, WrapErr};
use rpn_interpreter::token_type::{NumberRangeError, SingleTokenError};
use rpn_interpreter::{interpret, program_line, Lexer};
use std::fs;
use std::io;
use std::path::PathBuf;

/// type to help us parse the command line arguments
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// holds the Command types argument type
#[derive(Debug, Subcommand)]
enum Commands {
    /// takes a program file path and dumps its token stream
    Tokenize { filename: PathBuf },
    /// takes a program file path and evaluates it step by step
    Run { filename: PathBuf },
}

/// exit status when the tokenizer rejected the input
const EXIT_LEX_ERROR: i32 = 65;
/// exit status when a dispatch step failed at runtime
const EXIT_RUNTIME_ERROR: i32 = 70;

fn main() -> miette::Result<()> {
    let args = Args::parse();

    match args.command {
        Commands::Tokenize { filename } => {
            let line = read_program(&filename)?;
            let mut erry = false;

            for token in Lexer::new(&line) {
                match token {
                    Ok(t) => println!("{t}"),
                    Err(e) => {
                        erry = true;
                        eprintln!("{e:?}");
                    },
                }
            }
            println!("EOF  null");

            if erry {
                std::process::exit(EXIT_LEX_ERROR);
            }
        },
        Commands::Run { filename } => {
            let line = read_program(&filename)?;

            if let Err(e) = interpret(&line, &filename.display().to_string(), io::stdout().lock())
            {
                eprintln!("{e:?}");

                if e.downcast_ref::<SingleTokenError>().is_some()
                    || e.downcast_ref::<NumberRangeError>().is_some()
                {
                    std::process::exit(EXIT_LEX_ERROR);
                }
                std::process::exit(EXIT_RUNTIME_ERROR);
            }
        },
    }

    Ok(())
}

/// Read the single program line from `filename`.
fn read_program(filename: &PathBuf) -> miette::Result<String> {
    let file_contents = fs::read_to_string(filename)
        .into_diagnostic()
        .wrap_err_with(|| format!("reading {} file failed!", filename.display()))?;

    Ok(program_line(&file_contents)?.to_string())
}
