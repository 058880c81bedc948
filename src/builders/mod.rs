// This file is the module declaration file for the `builders` module.
// It declares and makes public the modules that turn a finished scan into
// something a user or another program can consume.

// The `pub mod exporter;` declaration exposes the `exporter` module.
//
// `exporter` module:
// Serializes a scanned tree and its summary to JSON, YAML or TOML through
// the `TreeExporter` trait.
pub mod exporter;

// The `pub mod observer;` declaration exposes the `observer` module.
//
// `observer` module:
// Defines the `ScanObserver` trait the scanner reports into while it walks,
// with a no-op, a `tracing` and an in-memory recording implementation.
pub mod observer;

// The `pub mod reporter;` declaration exposes the `reporter` module.
//
// `reporter` module:
// Generates the human-readable scan report printed by `scan --report`.
pub mod reporter;

// The `pub mod validator;` declaration exposes the `validator` module.
//
// `validator` module:
// Checks a loaded configuration for settings that would make a scan or its
// output meaningless.
pub mod validator;
