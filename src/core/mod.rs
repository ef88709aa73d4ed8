// This file is the module declaration file for the `core` module.
// In Rust, a `mod.rs` file within a directory (e.g., `src/core/`)
// serves two main purposes:
//
// 1. It declares the submodules contained within that directory.
// 2. It exposes these submodules to the parent module (`src/` in this case),
//    making them accessible to the entire crate.

// `config` module:
// This module is responsible for managing the application's configuration.
// It defines the data structures for the configuration file (`FileCrudConfig`),
// provides a `ConfigProvider` trait for abstracting configuration access, and
// includes a `ConfigManager` to handle loading, saving, and exporting it.
pub mod config;

// `error` module:
// The typed `StoreError` every store operation returns.
pub mod error;

// `store` module:
// The `FileStore` itself: create, read, update and delete on one file.
pub mod store;
