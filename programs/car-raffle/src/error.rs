use anchor_lang::prelude::error_code;

#[error_code]
pub enum RaffleError {
    #[msg("Unauthorized")]
    Unauthorized,
    #[msg("Raffle is not in a valid state for this operation")]
    InvalidRaffleState,
    #[msg("Ticket sales have closed for this raffle")]
    SalesClosed,
    #[msg("Total tickets must be between 1 and 100000")]
    InvalidTotalTickets,
    #[msg("Draw date must be in the future")]
    InvalidDrawDate,
    #[msg("Lottery date must be in the future")]
    InvalidLotteryDate,
    #[msg("Quantity must be between 1 and 10")]
    InvalidQuantity,
    #[msg("Not enough tickets left")]
    CapacityExceeded,
    #[msg("No ticket numbers left in the number space")]
    NumberSpaceExhausted,
    #[msg("Ticket number is already taken")]
    NumberAlreadyTaken,
    #[msg("Ticket does not belong to this owner")]
    NotTicketOwner,
    #[msg("Order does not belong to this raffle")]
    RaffleMismatch,
    #[msg("Payment has already been processed for this order")]
    AlreadyProcessed,
    #[msg("Invalid payment id")]
    InvalidPaymentId,
    #[msg("Ticket not found or payment not completed")]
    TicketNotFound,
    #[msg("Invalid verification code")]
    InvalidVerificationCode,
    #[msg("Lottery result must contain at least 5 digits")]
    InvalidLotteryResult,
    #[msg("Draw date cannot be in the future")]
    DrawDateInFuture,
    #[msg("Lottery draw has not happened yet")]
    LotteryDateNotReached,
    #[msg("Official lottery results are not available")]
    LotteryFeedUnavailable,
    #[msg("Winner already determined for this raffle")]
    AlreadyResolved,
    #[msg("No completed tickets for this raffle")]
    NoCompletedTickets,
    #[msg("Winning ticket order does not hold the drawn number")]
    WinningTicketMismatch,
    #[msg("Invalid calculation")]
    InvalidCalculation,
}
