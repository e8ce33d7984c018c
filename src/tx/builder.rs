//! Transaction builder. Inputs and commands are appended in call order;
//! arguments refer back to them by index.

use base64::Engine;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;

use crate::core::error::{TaisenError, TaisenResult};
use crate::core::ids;
use crate::tx::bcs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Argument {
    GasCoin,
    Input(u16),
    Result(u16),
    NestedResult(u16, u16),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArg {
    /// Object by id; version and ownership are resolved by the wallet
    Object(String),
    /// BCS-encoded pure value
    Pure(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCall {
    pub package: String,
    pub module: String,
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<Argument>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SplitCoins { coin: Argument, amounts: Vec<Argument> },
    MoveCall(MoveCall),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TransactionData {
    pub version: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    pub inputs: Vec<CallArg>,
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    data: TransactionData,
}

impl Default for Transaction {
    fn default() -> Self { Self::new() }
}

impl Transaction {
    pub fn new() -> Self {
        Self { data: TransactionData { version: 2, ..Default::default() } }
    }

    pub fn data(&self) -> &TransactionData { &self.data }

    pub fn set_sender(&mut self, sender: &str) -> TaisenResult<()> {
        self.data.sender = Some(ids::normalize(sender)?);
        Ok(())
    }

    pub fn to_json(&self) -> TaisenResult<Value> { Ok(serde_json::to_value(&self.data)?) }

    pub fn gas(&self) -> Argument { Argument::GasCoin }

    fn input(&mut self, arg: CallArg) -> TaisenResult<Argument> {
        let index = u16::try_from(self.data.inputs.len())
            .map_err(|_| TaisenError::InvalidInput("too many inputs".into()))?;
        self.data.inputs.push(arg);
        Ok(Argument::Input(index))
    }

    /// Shared or owned object input. The same id is only added once.
    pub fn object(&mut self, id: &str) -> TaisenResult<Argument> {
        let id = ids::normalize(id)?;
        if let Some(pos) = self.data.inputs.iter().position(|a| matches!(a, CallArg::Object(o) if *o == id)) {
            return Ok(Argument::Input(pos as u16));
        }
        self.input(CallArg::Object(id))
    }

    pub fn pure_u64(&mut self, value: u64) -> TaisenResult<Argument> { self.input(CallArg::Pure(bcs::u64(value))) }
    pub fn pure_bool(&mut self, value: bool) -> TaisenResult<Argument> { self.input(CallArg::Pure(bcs::bool(value))) }
    pub fn pure_string(&mut self, value: &str) -> TaisenResult<Argument> { self.input(CallArg::Pure(bcs::string(value))) }
    pub fn pure_address(&mut self, value: &str) -> TaisenResult<Argument> {
        let bytes = bcs::address(value)?;
        self.input(CallArg::Pure(bytes))
    }

    fn command(&mut self, command: Command) -> TaisenResult<u16> {
        let index = u16::try_from(self.data.commands.len())
            .map_err(|_| TaisenError::InvalidInput("too many commands".into()))?;
        self.data.commands.push(command);
        Ok(index)
    }

    /// Split `amounts` off `coin`; returns one coin argument per amount.
    pub fn split_coins(&mut self, coin: Argument, amounts: &[u64]) -> TaisenResult<Vec<Argument>> {
        let amounts = amounts
            .iter()
            .map(|a| self.pure_u64(*a))
            .collect::<TaisenResult<Vec<_>>>()?;
        let count = amounts.len() as u16;
        let index = self.command(Command::SplitCoins { coin, amounts })?;
        Ok((0..count).map(|i| Argument::NestedResult(index, i)).collect())
    }

    /// `package::module::function(arguments)`
    pub fn move_call(&mut self, package: &str, module: &str, function: &str, arguments: Vec<Argument>) -> TaisenResult<Argument> {
        let call = MoveCall {
            package: ids::normalize(package)?,
            module: module.to_string(),
            function: function.to_string(),
            type_arguments: Vec::new(),
            arguments,
        };
        let index = self.command(Command::MoveCall(call))?;
        Ok(Argument::Result(index))
    }

    /// Decoded u64 of a pure input, for inspection and tests.
    pub fn pure_u64_at(&self, arg: Argument) -> Option<u64> {
        let Argument::Input(i) = arg else { return None };
        match self.data.inputs.get(i as usize)? {
            CallArg::Pure(bytes) if bytes.len() == 8 => {
                let raw: [u8; 8] = bytes.as_slice().try_into().ok()?;
                Some(u64::from_le_bytes(raw))
            }
            _ => None,
        }
    }
}

fn kind<S: Serializer, V: Serialize + ?Sized>(serializer: S, kind: &str, value: &V) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(2))?;
    map.serialize_entry("$kind", kind)?;
    map.serialize_entry(kind, value)?;
    map.end()
}

impl Serialize for Argument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Argument::GasCoin => kind(serializer, "GasCoin", &true),
            Argument::Input(i) => kind(serializer, "Input", i),
            Argument::Result(i) => kind(serializer, "Result", i),
            Argument::NestedResult(i, j) => kind(serializer, "NestedResult", &[i, j]),
        }
    }
}

impl Serialize for CallArg {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CallArg::Object(id) => kind(serializer, "UnresolvedObject", &serde_json::json!({"objectId": id})),
            CallArg::Pure(bytes) => {
                let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
                kind(serializer, "Pure", &serde_json::json!({"bytes": encoded}))
            }
        }
    }
}

impl Serialize for Command {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Command::SplitCoins { coin, amounts } => {
                kind(serializer, "SplitCoins", &serde_json::json!({"coin": coin, "amounts": amounts}))
            }
            Command::MoveCall(call) => kind(serializer, "MoveCall", call),
        }
    }
}
