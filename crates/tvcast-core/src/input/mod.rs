// ── Remote-control input ──
//
// Normalized remote keys and the process-wide bus that fans them out to
// whichever screen or session is listening.

mod bus;
mod key;

pub use bus::{KeyEventBus, PublishReport, SubscriptionHandle};
pub use key::{Direction, RemoteKey};
