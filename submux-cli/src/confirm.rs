//! Interactive confirmation gate.
//!
//! Renders the proposed pairing and blocks for one line of input before
//! anything destructive happens. The acceptance policy is deliberately
//! loose: only input containing the character `n` rejects, everything
//! else (including an empty line or closed stdin) accepts. A typo is
//! silently accepted, so the rendered pairing is the last chance to catch
//! a bad match.

use std::io::{self, BufRead, Write};

use submux_core::PairedJob;

/// True if the confirmation input counts as a rejection.
pub fn is_rejection(input: &str) -> bool {
    input.contains('n')
}

/// Shows the pairing on stdout and reads the answer from stdin.
pub fn confirm_pairs(pairs: &[PairedJob]) -> io::Result<bool> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    confirm_pairs_with(pairs, &mut stdin.lock(), &mut stdout)
}

/// Testable worker behind `confirm_pairs` with injected reader and writer.
pub fn confirm_pairs_with<R: BufRead, W: Write>(
    pairs: &[PairedJob],
    input: &mut R,
    out: &mut W,
) -> io::Result<bool> {
    writeln!(out, "Joining subtitle files to these video files:")?;
    for pair in pairs {
        writeln!(out, "  {}\t{}", pair.subtitle, pair.video)?;
    }
    write!(out, "Are these pairs correct? (Y/n): ")?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(!is_rejection(line.trim_end()))
}
