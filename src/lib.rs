// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to implement the interactive tool.
//
// Module responsibilities:
// - `cookies`: Parses browser-exported cookie header strings and checks
//   for the expected authentication cookie names.
// - `cache`: Loads and saves the parsed cookie set to a local JSON file
//   so a session can be reused across runs.
// - `api`: Encapsulates the single HTTP interaction with the Blackbox
//   build service (create-sandbox-for-session) and the interpretation
//   of its response.
// - `ui`: Implements the interactive prompt flow and delegates the
//   request to `api`.
//
// Keeping this separation makes it easier to test the parsing, caching
// and response-interpretation logic without a terminal or a network.
pub mod api;
pub mod cache;
pub mod cookies;
pub mod ui;
