use clap::Parser;
use lang_lr1::{Code, Grammar, Lexer, Log, Lr1Parser, SemanticAnalyzer, Token};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "lrc",
    version,
    about = "Compile a C-like source file into quadruple intermediate code."
)]
struct Cli {
    /// Source program to compile.
    source: PathBuf,
    /// Grammar file describing the language.
    grammar: PathBuf,
    /// Load the parse tables from this cache file when it exists, write it otherwise.
    #[arg(long)]
    tables: Option<PathBuf>,
    /// Print the token stream.
    #[arg(long)]
    print_tokens: bool,
    /// Print the FIRST sets.
    #[arg(long)]
    print_first: bool,
    /// Print the ACTION and GOTO tables.
    #[arg(long)]
    print_tables: bool,
    /// Print the parse tree.
    #[arg(long)]
    print_tree: bool,
    /// Trace the lexer and the driver stacks (debug builds).
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let source = std::fs::read(&cli.source)
        .map_err(|err| format!("cannot open '{}': {}", cli.source.display(), err))?;
    let code = Code::new(&source);

    let lexer = Lexer::new();
    if cli.verbose {
        lexer.set_log(Log::Verbose("lexer"))?;
    }
    let tokens = lexer.tokenize(&code).map_err(|err| err.to_string())?;
    if cli.print_tokens {
        for token in &tokens {
            println!("{}", token);
        }
    }

    let grammar = Grammar::from_path(&cli.grammar).map_err(|err| err.to_string())?;
    let parser = match &cli.tables {
        Some(path) if path.exists() => {
            Lr1Parser::from_cache(grammar, path).map_err(|err| err.to_string())?
        }
        _ => {
            let parser = Lr1Parser::new(grammar).map_err(|err| err.to_string())?;
            if let Some(path) = &cli.tables {
                parser.save_tables(path).map_err(|err| err.to_string())?;
            }
            parser
        }
    };
    if cli.verbose {
        parser.set_log(Log::Verbose("driver"))?;
    }
    if cli.print_first {
        parser.print_first_sets();
    }
    if cli.print_tables {
        parser.print_tables();
    }

    let mut root = parser
        .parse(&Token::into_symbols(&tokens))
        .map_err(|err| err.to_string())?;
    if cli.print_tree {
        root.print().map_err(|err| err.to_string())?;
    }

    let mut analyzer = SemanticAnalyzer::new();
    analyzer.analyze(&mut root).map_err(|err| err.to_string())?;

    println!("Variable table:");
    analyzer.print_variable_table();
    println!();
    println!("Intermediate code:");
    root.print_intermediate_code();
    Ok(())
}
