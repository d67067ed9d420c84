// Drives the compiled binary through a pseudo terminal: waits for the first
// frame, types a two-character prompt, checks the completion notice is drawn
// and quits with ESC.
//
// Unix only and ignored by default since it needs a PTY:
// `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn short_prompt_shows_completion_notice() -> Result<(), Box<dyn std::error::Error>> {
    let bin = assert_cmd::cargo::cargo_bin("stype");
    let mut session = spawn(format!("{} -p hi -r 30", bin.display()))?;
    session.set_expect_timeout(Some(Duration::from_secs(5)));

    session.expect("Start typing...")?;
    session.send("hi")?;
    session.expect("Test completed!")?;

    session.send("\x1b")?;
    session.expect(Eof)?;
    Ok(())
}
