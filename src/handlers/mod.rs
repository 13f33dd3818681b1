// Handlers by access tier:
// public (no session) → protected (session) → elevated (session + admin role)
pub mod elevated;
pub mod protected;
pub mod public;
pub mod utils;
