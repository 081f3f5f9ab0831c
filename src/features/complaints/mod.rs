//! Citizen complaints feature.
//!
//! Complaints are geolocated reports of urban problems. Submissions close
//! to an existing open complaint of the same category are grouped into it
//! as supports instead of creating near-duplicate records, and deleting a
//! complaint reassigns its supports rather than discarding them.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/complaints` | List complaints (filterable, paginated) |
//! | GET | `/api/complaints/{id}` | Get complaint by id |
//! | POST | `/api/complaints` | Submit a complaint (token or guest name) |
//! | DELETE | `/api/complaints/{id}` | Delete own complaint, reassigning supports |
//! | POST | `/api/complaints/{id}/resolve` | Author marks complaint resolved |
//! | PATCH | `/api/complaints/{id}/status` | Official changes complaint status |

pub mod dtos;
pub mod geo;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

pub use services::{ComplaintService, DeletionService, GroupingService};
