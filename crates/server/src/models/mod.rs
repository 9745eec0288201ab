//! Domain types.
//!
//! These are validated domain objects, separate from database row types
//! (which live next to their repositories in [`crate::db`]). Types that
//! appear in API responses serialize with the reference wire field names
//! (Portuguese), so the JSON contract is unchanged while the code stays in
//! one language.

pub mod flyer;
pub mod offer;
pub mod supermarket;
pub mod user;

pub use flyer::{Flyer, FlyerWithMarket, NewFlyer};
pub use offer::{NewOffer, Offer, OfferWithMarket};
pub use supermarket::{NewSupermarket, Supermarket};
pub use user::{NewUser, User};
