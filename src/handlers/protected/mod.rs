// handlers/protected/mod.rs - Protected handlers (Basic authentication required)
//
// Every route here sits behind `basic_auth_middleware` and `require_card_owner`.
// Handlers receive the authenticated `Principal` as a request extension and use
// its name as the owner key for every store call.

pub mod cashcards;
