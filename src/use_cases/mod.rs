// Use cases layer: application workflows over the domain ports.

pub mod accounts;
pub mod dashboard;
pub mod gift_shop;
pub mod guest_access;
pub mod guests;
pub mod invitations;
pub mod menus;
pub mod photo_challenge;
pub mod photos;
pub mod schedule;
pub mod site_config;
pub mod timeline;
mod validation;

#[cfg(test)]
pub(crate) mod test_support;
