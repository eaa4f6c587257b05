//! HTTP matching service.
//!
//! Loads one reference hash list at startup and classifies hashes posted to
//! it, using the same strategies as the `match` command.
//!
//! ## Starting the Server
//!
//! ```text
//! # Start on default port 8080
//! hash-match serve --references reference.csv
//!
//! # Custom port, threshold and auto-open browser
//! hash-match serve --references reference.csv --port 3000 --threshold 30000 --open
//! ```
//!
//! ## API Endpoints
//!
//! - `GET /` - Page with a hash input form
//! - `GET /health` - Liveness check
//! - `GET /api/store` - Reference store size, hash length and default threshold
//! - `POST /api/match` - Classify one hash (JSON body)
//!
//! ```text
//! POST /api/match
//! {"name": "upload-17", "hash": "12,0,255,...", "mode": "best", "threshold": 30000}
//!
//! {"name": "upload-17", "mode": "best", "threshold": 30000,
//!  "outcome": "matched", "index": 4, "distance": 1520, "reference": "known.jpg",
//!  "processing_time_ms": 0}
//! ```

pub mod server;
