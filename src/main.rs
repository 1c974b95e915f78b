// idl: parse an IDL file, report diagnostics, optionally dump or view the module

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser as _;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use idl_parser::parser::{Diagnostic, Module, Options, Parser};
use idl_parser::ui::App;

#[derive(clap::Parser, Debug)]
#[command(name = "idl")]
#[command(version, about = "Parse an IDL file and report its diagnostics")]
struct Args {
    /// Path to the IDL file
    file: PathBuf,

    /// Print the parsed module in canonical form
    #[arg(long)]
    dump: bool,

    /// Open the terminal viewer
    #[arg(long)]
    view: bool,

    /// Reject interfaces declared without a namespace
    #[arg(long)]
    require_namespace: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut parser = Parser::new(Options {
        require_namespace: args.require_namespace,
    });

    eprintln!("Parsing {}...", args.file.display());
    let ok = match parser.parse(&args.file) {
        Ok(ok) => ok,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let diagnostics = parser.take_diagnostics();
    for diag in &diagnostics {
        eprintln!("{}", diag);
    }

    let Some(module) = parser.take_module() else {
        process::exit(1);
    };

    if ok {
        eprintln!(
            "Parsed successfully. Found {} interface(s).",
            module.local_interface_count()
        );
    } else {
        eprintln!("Parse finished with {} diagnostic(s).", diagnostics.len());
    }

    if args.dump {
        print!("{}", module);
    }

    if args.view {
        let source = fs::read_to_string(&args.file)?;
        run_viewer(&module, diagnostics, source)?;
    }

    if !ok {
        process::exit(1);
    }
    Ok(())
}

fn run_viewer(
    module: &Module,
    diagnostics: Vec<Diagnostic>,
    source: String,
) -> Result<(), Box<dyn std::error::Error>> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(module, diagnostics, source);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
