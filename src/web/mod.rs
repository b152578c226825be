//! JSON HTTP API for diagnosis suggestions.
//!
//! The server shares one catalog across all requests; each request runs the
//! stateless matching engine on its own selection.
//!
//! ## Starting the Server
//!
//! ```text
//! # Start on default port 8080
//! symptom-dx serve
//!
//! # Custom port, all interfaces, custom catalog
//! symptom-dx serve --port 3000 --address 0.0.0.0 --catalog my_catalog.json
//! ```
//!
//! ## API Endpoints
//!
//! - `GET /health` - Liveness check
//! - `GET /api/catalog` - All diseases in catalog order
//! - `GET /api/symptoms` - The symptom vocabulary
//! - `POST /api/analyze` - Suggest a diagnosis for `{"symptoms": [...], "limit": n}`

pub mod server;
