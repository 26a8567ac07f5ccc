use anyhow::{Context, Result, bail};
use std::io::{self, BufRead, IsTerminal, Read};
use std::path::Path;
use zeroize::Zeroizing;

pub fn read_password() -> Result<Zeroizing<String>> {
    //  Environment Variable
    //  SALTBOX_PASSWORD="supersecret" saltbox stretch --salt ...
    if let Ok(pw) = std::env::var("SALTBOX_PASSWORD") {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    //  stdin (Pipeline)
    //  printf "%s" "$PASSWORD" | saltbox stretch --salt ...
    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().lock().read_line(&mut buf)?;
        trim_newline(&mut buf);

        if !buf.is_empty() {
            return Ok(buf);
        }
    }

    //  Interactive (TTY)
    if io::stdin().is_terminal() {
        let pw = rpassword::prompt_password("Password: ")?;
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    bail!("No password provided")
}

/// Read the whole message from `path`, or from stdin when no path is given.
pub fn read_input(path: Option<&Path>) -> Result<Zeroizing<Vec<u8>>> {
    let mut buf = Zeroizing::new(Vec::new());
    match path {
        Some(p) => {
            buf.extend_from_slice(
                &std::fs::read(p).with_context(|| format!("failed to read {}", p.display()))?,
            );
        }
        None => {
            io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read stdin")?;
        }
    }
    Ok(buf)
}

/// Decode a hex argument such as a key, ignoring surrounding whitespace.
pub fn decode_hex(what: &str, value: &str) -> Result<Zeroizing<Vec<u8>>> {
    hex::decode(value.trim())
        .map(Zeroizing::new)
        .with_context(|| format!("{what} is not valid hex"))
}

fn trim_newline(s: &mut String) {
    while s.ends_with('\n') || s.ends_with('\r') {
        s.pop();
    }
}
