// UI layer: the interactive prompt flow, built on `dialoguer`.
// The functions are small and synchronous to make the flow easy to follow.

use crate::api::{ApiClient, SandboxOutcome, SandboxResponse};
use crate::cache::CookieCache;
use crate::cookies::{missing_auth_cookies, parse_cookie_string, CookieMap};
use anyhow::Result;
use crossterm::style::Stylize;
use dialoguer::{Confirm, Input};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Main interactive flow. Receives an `ApiClient` instance and walks the
/// user through cookie entry, the sandbox request and the result.
///
/// Every path, including the early aborts on missing input, ends with a
/// press-Enter pause so the output stays readable when the tool is run
/// from a double-click terminal window.
pub fn run(api: ApiClient) -> Result<()> {
    banner();

    let cache = CookieCache::default_path();
    let cookies = match collect_cookies(&cache)? {
        Some(cookies) => cookies,
        // User aborted; the pause already happened inside.
        None => return Ok(()),
    };

    println!();
    let session_id: String = Input::new()
        .with_prompt("Enter Session ID")
        .allow_empty(true)
        .interact_text()?;
    let session_id = session_id.trim().to_string();

    if session_id.is_empty() {
        println!("{}", "Error: No session ID provided".red());
    } else {
        request_sandbox(&api, &session_id, &cookies);
    }

    pause()
}

fn banner() {
    let line = "=".repeat(60);
    println!("{}", line);
    println!("{}", "Blackbox AI - Get Sandbox ID".bold());
    println!("{}", line);
    println!();
}

/// Obtain a cookie set: either the cached one (if present and the user
/// wants it) or a freshly pasted header string. Returns `None` when the
/// user aborts (no cookies pasted, or declined to continue without the
/// auth cookies); the abort paths pause before returning.
fn collect_cookies(cache: &CookieCache) -> Result<Option<CookieMap>> {
    if let Some(saved) = cache.load()? {
        println!("{}", "✓ Found saved cookies from previous session!".green());
        if Confirm::new()
            .with_prompt("Use saved cookies?")
            .default(true)
            .interact()?
        {
            println!("{}", "✓ Using saved cookies".green());
            return Ok(Some(saved));
        }
        println!();
        println!("Please paste your fresh cookie string:");
    }

    println!();
    println!("Paste your cookie string here:");
    println!("(The long string from Network tab > Cookie header)");
    println!();
    let cookie_string: String = Input::new()
        .with_prompt("Cookie")
        .allow_empty(true)
        .interact_text()?;
    let cookie_string = cookie_string.trim().to_string();

    if cookie_string.is_empty() {
        println!("{}", "Error: No cookies provided".red());
        pause()?;
        return Ok(None);
    }

    let cookies = parse_cookie_string(&cookie_string);
    println!();
    println!(
        "{}",
        format!("✓ Parsed {} cookies successfully!", cookies.len()).green()
    );

    let missing = missing_auth_cookies(&cookies);
    if !missing.is_empty() {
        println!();
        println!("{}", "WARNING: Missing authentication cookies!".yellow());
        for name in &missing {
            println!("  - {}", name);
        }
        println!("Make sure you copied from the Network tab, not the JavaScript console!");
        let go_on = Confirm::new()
            .with_prompt("Continue anyway?")
            .default(false)
            .interact()?;
        if !go_on {
            pause()?;
            return Ok(None);
        }
    }

    println!();
    if Confirm::new()
        .with_prompt("Save cookies for next time?")
        .default(true)
        .interact()?
    {
        cache.save(&cookies)?;
        println!(
            "{}",
            format!(
                "✓ Cookies saved to '{}' for next time!",
                cache.path().display()
            )
            .green()
        );
    }

    Ok(Some(cookies))
}

/// Fire the one request under a spinner and print whatever came back.
fn request_sandbox(api: &ApiClient, session_id: &str, cookies: &CookieMap) {
    println!();
    println!("Sending request for session: {}", session_id);

    // indicatif spinner while the blocking call is in flight.
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    spinner.set_message("Please wait...");
    spinner.enable_steady_tick(Duration::from_millis(80));

    let outcome = api.create_sandbox(session_id, cookies);
    spinner.finish_and_clear();

    match outcome {
        Ok(SandboxOutcome::Created(resp)) => print_success(&resp),
        Ok(SandboxOutcome::AuthExpired) => {
            println!();
            println!("{}", "ERROR: 401 Unauthorized".red());
            println!("Your cookies have expired. Please enter fresh cookies!");
        }
        Ok(SandboxOutcome::Rejected(reason)) => {
            println!();
            println!("{}", "Request failed:".red());
            println!("{}", reason);
        }
        Err(e) => {
            println!();
            println!("{}", format!("ERROR: {:#}", e).red());
        }
    }
}

/// The summary block for a created sandbox. Absent fields print as `-`.
fn print_success(resp: &SandboxResponse) {
    let line = "=".repeat(50);
    println!();
    println!("{}", "SUCCESS!".green().bold());
    println!("{}", line);
    println!("Sandbox ID: {}", resp.sandbox_id.as_deref().unwrap_or("-"));
    println!("Session ID: {}", resp.session_id.as_deref().unwrap_or("-"));
    match resp.duration {
        Some(ms) => println!("Duration: {}ms", ms),
        None => println!("Duration: -"),
    }
    println!("Dev Server Started: {}", show_flag(resp.dev_server_started));
    println!("NPM Install: {}", show_flag(resp.npm_install_completed));
    println!("{}", line);

    if let Some(id) = resp.sandbox_id.as_deref() {
        println!();
        println!("Your sandbox ID: {}", id.bold());
        println!("(Copy this for your use)");
    }
}

fn show_flag(value: Option<bool>) -> String {
    value.map(|b| b.to_string()).unwrap_or_else(|| "-".into())
}

/// Final acknowledgment so output is not lost when the terminal closes
/// with the process.
fn pause() -> Result<()> {
    println!();
    let _: String = Input::new()
        .with_prompt("Press Enter to exit")
        .allow_empty(true)
        .interact_text()?;
    Ok(())
}
