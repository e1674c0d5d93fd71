//! Domain endpoints of the EagleView API
//!
//! Each action is a thin wrapper over [`EagleView::request`](super::EagleView::request):
//! it picks the path and parameter placement and shapes the result.

mod orders;
mod products;
mod reports;
