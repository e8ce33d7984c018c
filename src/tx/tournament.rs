//! Tournament contract calls.

use serde::{Deserialize, Serialize};

use crate::core::constants::{contract, MAX_FEE_BPS};
use crate::core::error::{TaisenError, TaisenResult};
use crate::tx::builder::Transaction;

/// Deployed object ids the calls need.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContractIds {
    pub package_id: String,
    pub platform_config_id: String,
    pub game_registry_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreateTournamentParams {
    pub name: String,
    pub is_remote: bool,
    pub venue_address: String,
    pub venue_city: String,
    pub venue_country: String,
    /// Start time, ms since epoch
    pub date: u64,
    pub game_type: String,
    pub description: String,
    /// MIST
    pub entry_fee: u64,
    pub gm_fee_bps: u16,
    /// MIST added to the sponsor pool at creation
    pub sponsor_amount: u64,
}

impl CreateTournamentParams {
    pub fn validate(&self) -> TaisenResult<()> {
        if self.name.trim().is_empty() {
            return Err(TaisenError::InvalidInput("tournament name is required".into()));
        }
        if self.game_type.trim().is_empty() {
            return Err(TaisenError::InvalidInput("game type is required".into()));
        }
        if self.gm_fee_bps > MAX_FEE_BPS {
            return Err(TaisenError::InvalidInput(format!("gm fee {} bps exceeds {}", self.gm_fee_bps, MAX_FEE_BPS)));
        }
        Ok(())
    }
}

/// Payment covers the platform creation fee plus the sponsor deposit.
pub fn build_create_tournament_tx(params: &CreateTournamentParams, ids: &ContractIds, creation_fee: u64) -> TaisenResult<Transaction> {
    params.validate()?;
    let payment = creation_fee
        .checked_add(params.sponsor_amount)
        .ok_or_else(|| TaisenError::InvalidInput("payment overflows u64".into()))?;

    let mut tx = Transaction::new();
    let coins = tx.split_coins(tx.gas(), &[payment])?;

    let arguments = vec![
        tx.object(&ids.platform_config_id)?,
        tx.object(&ids.game_registry_id)?,
        tx.pure_string(&params.name)?,
        tx.pure_bool(params.is_remote)?,
        tx.pure_string(&params.venue_address)?,
        tx.pure_string(&params.venue_city)?,
        tx.pure_string(&params.venue_country)?,
        tx.pure_u64(params.date)?,
        tx.pure_string(&params.game_type)?,
        tx.pure_string(&params.description)?,
        tx.pure_u64(params.entry_fee)?,
        tx.pure_u64(u64::from(params.gm_fee_bps))?,
        coins[0],
    ];
    debug_assert_eq!(arguments.len(), contract::CREATE_TOURNAMENT_ARITY);

    tx.move_call(&ids.package_id, contract::TOURNAMENT_MODULE, contract::CREATE_TOURNAMENT, arguments)?;
    Ok(tx)
}

/// Free tournaments still pass a zero-value coin.
pub fn build_register_tx(package_id: &str, tournament_id: &str, username: &str, entry_fee: u64) -> TaisenResult<Transaction> {
    if username.trim().is_empty() {
        return Err(TaisenError::InvalidInput("username is required".into()));
    }
    let mut tx = Transaction::new();
    let coins = tx.split_coins(tx.gas(), &[entry_fee])?;
    let arguments = vec![tx.object(tournament_id)?, tx.pure_string(username)?, coins[0]];
    tx.move_call(package_id, contract::TOURNAMENT_MODULE, contract::REGISTER, arguments)?;
    Ok(tx)
}

pub fn build_start_tournament_tx(package_id: &str, tournament_id: &str) -> TaisenResult<Transaction> {
    let mut tx = Transaction::new();
    let arguments = vec![tx.object(tournament_id)?];
    tx.move_call(package_id, contract::TOURNAMENT_MODULE, contract::START_TOURNAMENT, arguments)?;
    Ok(tx)
}

pub fn build_report_match_result_tx(package_id: &str, tournament_id: &str, match_id: u64, winner: &str) -> TaisenResult<Transaction> {
    let mut tx = Transaction::new();
    let arguments = vec![tx.object(tournament_id)?, tx.pure_u64(match_id)?, tx.pure_address(winner)?];
    tx.move_call(package_id, contract::TOURNAMENT_MODULE, contract::REPORT_MATCH_RESULT, arguments)?;
    Ok(tx)
}
