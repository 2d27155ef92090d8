/*!
 * Authenticated-user extractor
 *
 * Responsibility:
 * - hand the `Principal` the access gate attached to the request to handlers
 *
 * Public API:
 * - AuthUser
 */

mod core;

pub use core::AuthUser;
