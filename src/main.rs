use anyhow::{Context, Result};
use clap::Parser;
use marble_solver::{
    board::Board,
    move_::format_moves,
    solver::{SolveResult, solve},
};

use std::{
    io::{IsTerminal, Read, Write, stderr, stdin},
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Preview the initial board without solving
    #[arg(short, long)]
    preview: bool,
    /// Path to a board layout file to solve
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let Cli { preview, file } = Cli::parse();

    let board = if let Some(file) = file {
        let content = std::fs::read_to_string(&file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        Board::parse(&content).context("Failed to parse board")?
    } else if !stdin().is_terminal() {
        let mut content = String::new();
        stdin()
            .read_to_string(&mut content)
            .context("Failed to read from stdin")?;
        Board::parse(&content).context("Failed to parse board")?
    } else {
        Board::standard()
    };

    if preview {
        println!("{}", board.to_pretty_string());
        return Ok(());
    }

    println!("Marble solitaire — 33-hole cross board\n");
    println!("{}\n", board.to_pretty_string());

    let SolveResult {
        states,
        elapsed,
        moves,
    } = with_spinner("Solving the puzzle...", move || solve(board))?;
    let elapsed_str = format_elapsed(elapsed);
    println!(
        "✓ Solved in {} moves — Time: {elapsed_str}, States: {states}\n",
        moves.len()
    );
    print!("{}", format_moves(&moves));

    Ok(())
}

fn with_spinner<T, F: FnOnce() -> T>(message: &str, f: F) -> T {
    if stderr().is_terminal() {
        let spinning = Arc::new(AtomicBool::new(true));
        let spinning_clone = Arc::clone(&spinning);
        let message = message.to_string();

        let handle = std::thread::spawn(move || {
            let spinner_chars = ['|', '/', '-', '\\'];
            let mut i = 0;
            let stderr = stderr();
            let mut handle = stderr.lock();

            let _ = write!(handle, "\x1b[?25l"); // hide cursor
            let _ = handle.flush();

            while spinning_clone.load(Ordering::Relaxed) {
                let spinner_char = spinner_chars[i % spinner_chars.len()];
                let _ = write!(handle, "\r{spinner_char} {message}");
                let _ = handle.flush();
                std::thread::sleep(Duration::from_millis(100));
                i += 1;
            }

            let _ = write!(handle, "\r\x1b[2K\r\x1b[?25h"); // clear line and show cursor
            let _ = handle.flush();
        });

        let result = f();
        spinning.store(false, Ordering::Relaxed);
        let _ = handle.join();
        result
    } else {
        f()
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs < 90 {
        let ms = elapsed.subsec_millis();
        format!("{secs}.{ms:03}s")
    } else {
        let minutes = secs / 60;
        let secs = secs % 60;
        format!("{minutes}m {secs}s")
    }
}
