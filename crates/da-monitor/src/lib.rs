//! # DA Monitor
//!
//! Watches a Celestia node: for every new header it fetches the blobs in one
//! namespace, fetches the extended data square, and optionally submits a blob
//! and reads it back. A one-shot submission also runs at startup.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                       Monitor                        │
//! │  ┌─────────────────────┐   ┌──────────────────────┐  │
//! │  │ BootstrapSubmission │   │   HeaderEventLoop    │  │
//! │  │  (fatal on error)   │   │ ┌──────────────────┐ │  │
//! │  └──────────┬──────────┘   │ │  ActionPipeline  │ │  │
//! │             │              │ │ blobs→EDS→submit │ │  │
//! │             │              │ └────────┬─────────┘ │  │
//! │             │              └──────────┼───────────┘  │
//! │             └───────────┬─────────────┘              │
//! │                   ┌─────▼─────┐                      │
//! │                   │  DaNode   │  outbound port       │
//! │                   └─────┬─────┘                      │
//! └─────────────────────────┼────────────────────────────┘
//!                           │
//!                 RpcNode (JSON-RPC / WebSocket)
//! ```
//!
//! A failing step inside a pipeline run is logged and reported; the run and
//! the loop continue. Subscription setup, a closed subscription and any
//! bootstrap failure are fatal.

pub mod adapters;
pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
pub mod ports;

pub use adapters::RpcNode;
pub use application::{
    ActionPipeline, BlobSubmitter, BootstrapSubmission, HeaderEventLoop, Monitor,
};
pub use config::{MonitorConfig, Variant};
pub use domain::{
    BlobProducer, EdsSummary, FixedBlobProducer, GreetingBlobProducer, MonitorError, NodeError,
    PipelineReport, StepOutcome, SubmissionReceipt,
};
pub use ports::{DaNode, HeaderSubscription, MockBehavior, MockDaNode, NodeCall};
