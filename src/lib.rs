//! Storylet fixers - reactive text fixers and game-state matchers.
//!
//! This library provides the core functionality for augmenting a page that a
//! third-party application renders and re-renders, including:
//! - A live document model with batched mutation observation
//! - Fixers that rewrite text as it appears, without observing their own writes
//! - Composable matchers deciding when an augmentation applies
//! - Settings and rule configuration
//!
//! # Example
//!
//! ```
//! use storylet_fixers::config::{ADD_THOUSANDS_SEPARATOR, Settings};
//! use storylet_fixers::dispatcher::FixerDispatcher;
//! use storylet_fixers::dom::Document;
//! use storylet_fixers::fixers::ThousandSeparatorFixer;
//!
//! let mut doc = Document::new();
//! let mut dispatcher = FixerDispatcher::new();
//! dispatcher.register(Box::new(ThousandSeparatorFixer::new()));
//!
//! let settings = Settings::from_pairs([(ADD_THOUSANDS_SEPARATOR, toml::Value::Boolean(true))]);
//! dispatcher.apply_settings(&mut doc, &settings);
//!
//! let shop = doc.create_element("div", "shop");
//! let root = doc.root();
//! doc.append_child(root, shop);
//! dispatcher.node_added(&mut doc, root);
//! ```

pub mod config;
pub mod dispatcher;
pub mod dom;
pub mod error;
pub mod fixers;
pub mod matchers;
pub mod numbers;

pub use error::{FixerError, Result};
