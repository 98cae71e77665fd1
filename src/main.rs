use psrepl::{Config, Interpreter};

// bring in rust's io
use std::io::{self, BufRead, Write};

// only when RUST_LOG is set, and on stderr so it never mixes with program output
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn main() -> io::Result<()> {
    init_tracing();

    // start our interpreter
    let config = Config::from_env();
    tracing::debug!(?config, "starting");
    let mut my_interpreter = Interpreter::with_config(config);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    // basic loop to act as a repl
    loop {
        print!("REPL({})> ", my_interpreter.stack_count());
        io::stdout().flush()?;

        let mut buf = String::new();
        if input.read_line(&mut buf)? == 0 {
            break;
        }
        let line = buf.trim();
        if line.is_empty() {
            continue;
        }

        // run the code
        my_interpreter.process_input(line);
        if my_interpreter.is_halted() {
            break;
        }
    }
    Ok(())
}
