use anchor_lang::prelude::*;
use arrayref::array_ref;
use solana_program::hash::hashv;
use solana_program::keccak;
use solana_program::program_error::ProgramError;

use crate::constants::VERIFICATION_CODE_LEN;

/// Read the most recent blockhash out of the RecentBlockhashes sysvar,
/// used as the base entropy for ticket number sampling.
pub fn recent_blockhash_seed(recent_blockhashes: &AccountInfo) -> Result<[u8; 32]> {
    let bytes = recent_blockhashes.data.borrow();
    let data: &[u8] = &bytes;
    let entry_count = u64::from_le_bytes(*array_ref![data, 0, 8]);
    if entry_count == 0 {
        // Impossible on a live cluster
        return Err(ProgramError::InvalidAccountData.into());
    }
    Ok(*array_ref![data, 8, 32])
}

/// Mix the base entropy with the raffle and reservation identity so
/// parallel reservations walk different candidate sequences.
pub fn draw_seed(base: &[u8; 32], raffle: &Pubkey, order_index: u64) -> [u8; 32] {
    keccak::hashv(&[base, raffle.as_ref(), &order_index.to_le_bytes()]).to_bytes()
}

/// Expand a 32-byte seed into its n-th pseudo-random draw.
//https://docs.chain.link/docs/chainlink-vrf-best-practices/#getting-multiple-random-number
pub fn random(seed: &[u8; 32], n: u64) -> u32 {
    let digest = keccak::hashv(&[seed, &n.to_le_bytes()]);
    u32::from_le_bytes(*array_ref![digest.as_ref(), 0, 4])
}

/// Reduce a published lottery result to its last five digits: strip
/// everything that is not a digit, keep the last five, and treat a
/// shorter tail as left-padded with zeros.
pub fn extract_winning_digits(lottery_result: &str) -> u32 {
    let digits: Vec<u8> = lottery_result
        .bytes()
        .filter(|b| b.is_ascii_digit())
        .collect();
    let tail = if digits.len() > 5 {
        &digits[digits.len() - 5..]
    } else {
        &digits[..]
    };
    tail.iter().fold(0u32, |acc, b| acc * 10 + (b - b'0') as u32)
}

/// Number of digits in a published lottery result.
pub fn digit_count(lottery_result: &str) -> usize {
    lottery_result.chars().filter(|c| c.is_ascii_digit()).count()
}

/// Ticket numbers travel as five-digit zero-padded strings.
pub fn format_ticket_number(number: u32) -> String {
    format!("{:05}", number)
}

/// Deterministic 8-character code proving a ticket's provenance.
///
/// SHA-256 over order key, zero-padded number, raffle key and owner key,
/// truncated to 8 uppercase hex characters. Recomputable from stored
/// fields alone, so no code ever needs to be persisted.
pub fn verification_code(
    order: &Pubkey,
    ticket_number: u32,
    raffle: &Pubkey,
    owner: &Pubkey,
) -> String {
    let number = format_ticket_number(ticket_number);
    let digest = hashv(&[
        order.as_ref(),
        number.as_bytes(),
        raffle.as_ref(),
        owner.as_ref(),
    ]);
    let bytes = digest.to_bytes();
    let mut code = String::with_capacity(VERIFICATION_CODE_LEN);
    for byte in &bytes[..VERIFICATION_CODE_LEN / 2] {
        code.push_str(&format!("{:02X}", byte));
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn winning_digits_take_the_last_five() {
        assert_eq!(extract_winning_digits("12345"), 12_345);
        assert_eq!(extract_winning_digits("9812345"), 12_345);
        assert_eq!(extract_winning_digits("Sorteo 2890 - 054321"), 54_321);
    }

    #[test]
    fn winning_digits_pad_short_results() {
        assert_eq!(extract_winning_digits("123"), 123);
        assert_eq!(extract_winning_digits("A-7"), 7);
        assert_eq!(extract_winning_digits(""), 0);
    }

    #[test]
    fn digit_count_ignores_formatting() {
        assert_eq!(digit_count("No. 123-456"), 6);
        assert_eq!(digit_count("serie A"), 0);
    }

    #[test]
    fn ticket_numbers_are_zero_padded() {
        assert_eq!(format_ticket_number(7), "00007");
        assert_eq!(format_ticket_number(99_999), "99999");
    }

    #[test]
    fn verification_code_is_deterministic() {
        let order = Pubkey::new_unique();
        let raffle = Pubkey::new_unique();
        let owner = Pubkey::new_unique();

        let first = verification_code(&order, 12_345, &raffle, &owner);
        let second = verification_code(&order, 12_345, &raffle, &owner);
        assert_eq!(first, second);
        assert_eq!(first.len(), VERIFICATION_CODE_LEN);
        assert!(first
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }

    #[test]
    fn verification_code_binds_every_field() {
        let order = Pubkey::new_unique();
        let raffle = Pubkey::new_unique();
        let owner = Pubkey::new_unique();

        let code = verification_code(&order, 12_345, &raffle, &owner);
        assert_ne!(code, verification_code(&order, 12_346, &raffle, &owner));
        assert_ne!(
            code,
            verification_code(&Pubkey::new_unique(), 12_345, &raffle, &owner)
        );
        assert_ne!(
            code,
            verification_code(&order, 12_345, &raffle, &Pubkey::new_unique())
        );
    }

    #[test]
    fn random_expansion_is_reproducible() {
        let seed = [7u8; 32];
        assert_eq!(random(&seed, 0), random(&seed, 0));
        assert_ne!(random(&seed, 0), random(&seed, 1));

        let other = draw_seed(&seed, &Pubkey::new_unique(), 3);
        assert_ne!(random(&seed, 0), random(&other, 0));
    }
}
