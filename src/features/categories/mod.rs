//! Tool category tree for the Video-IA catalog.
//!
//! Categories form a forest: each category has at most one parent and no
//! category is its own ancestor. Every category carries a unique, URL-safe
//! slug derived from its name.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/categories` | No | List categories (flat, filtered, or `?tree=true`) |
//! | GET | `/api/categories/{slug}` | No | Get category by slug |
//! | POST | `/api/admin/categories` | Admin | Create category |
//! | GET | `/api/admin/categories/{id}` | Admin | Get category by ID |
//! | PUT | `/api/admin/categories/{id}` | Admin | Update (rename, move, re-slug) |
//! | DELETE | `/api/admin/categories/{id}` | Admin | Delete a leaf category without tools |
//! | GET | `/api/admin/categories/{id}/descendants` | Admin | IDs of all descendants |

pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod tree;

pub use services::CategoryService;
