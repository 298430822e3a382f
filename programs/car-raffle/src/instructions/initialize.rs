use anchor_lang::prelude::*;

use crate::constants::CONFIG_SEED;
use crate::state::RaffleConfig;

/// Accounts required to initialize the program configuration.
#[derive(Accounts)]
pub struct InitializeConfig<'info> {
    /// The account paying for account creation; becomes the admin.
    #[account(mut)]
    pub payer: Signer<'info>,

    /// The singleton configuration account.
    #[account(
        init,
        payer = payer,
        space = 8 + RaffleConfig::INIT_SPACE,
        seeds = [CONFIG_SEED],
        bump
    )]
    pub config: Account<'info, RaffleConfig>,

    /// System program to create accounts.
    pub system_program: Program<'info, System>,
}

/// Initializes the configuration with the external-collaborator
/// authorities: the lottery feed poster and the payment gateway
/// reconciler.
///
/// # Arguments
/// * `oracle_authority` - signer allowed to post lottery draw results
/// * `payment_authority` - signer allowed to report payment outcomes
/// * `allow_unofficial_results` - development switch accepting synthetic
///   draws flagged as unofficial
pub fn process_initialize_config(
    ctx: Context<InitializeConfig>,
    oracle_authority: Pubkey,
    payment_authority: Pubkey,
    allow_unofficial_results: bool,
) -> Result<()> {
    let config = &mut ctx.accounts.config;
    config.bump = ctx.bumps.config;
    config.authority = ctx.accounts.payer.key();
    config.oracle_authority = oracle_authority;
    config.payment_authority = payment_authority;
    config.allow_unofficial_results = allow_unofficial_results;
    config.raffles_created = 0;
    Ok(())
}
