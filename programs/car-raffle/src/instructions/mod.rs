pub mod confirm_payment;
pub mod create_raffle;
pub mod determine_winner;
pub mod initialize;
pub mod post_draw_result;
pub mod reserve_tickets;
pub mod set_raffle_status;
pub mod verify_ticket;

pub use confirm_payment::*;
pub use create_raffle::*;
pub use determine_winner::*;
pub use initialize::*;
pub use post_draw_result::*;
pub use reserve_tickets::*;
pub use set_raffle_status::*;
pub use verify_ticket::*;
