//! Init code assembly: creation bytecode followed by the ABI-encoded
//! constructor arguments.

use std::fmt;

use alloy_dyn_abi::{DynSolType, DynSolValue};

use crate::crypto::keccak256;
use crate::error::{Error, Result};

/// One constructor argument: its Solidity type and value.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstructorArg {
    pub ty: DynSolType,
    pub value: DynSolValue,
}

/// Constructor arguments in declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConstructorArgs(Vec<ConstructorArg>);

impl ConstructorArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an already typed argument. The pair is type-checked when encoded.
    pub fn push(mut self, ty: DynSolType, value: DynSolValue) -> Self {
        self.0.push(ConstructorArg { ty, value });
        self
    }

    /// Appends an argument given as strings, e.g. `("address", "0x303d...")`.
    pub fn parse(mut self, ty: &str, value: &str) -> Result<Self> {
        let ty = DynSolType::parse(ty)
            .map_err(|e| Error::Encoding(format!("unknown type {ty:?}: {e}")))?;
        let value = ty
            .coerce_str(value)
            .map_err(|e| Error::Encoding(format!("cannot parse {value:?} as {ty}: {e}")))?;
        self.0.push(ConstructorArg { ty, value });
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConstructorArg> {
        self.0.iter()
    }

    /// ABI-encodes the arguments as a parameter list, the layout Solidity
    /// constructors read after the creation code.
    pub fn encode(&self) -> Result<Vec<u8>> {
        for (i, arg) in self.0.iter().enumerate() {
            if !arg.ty.matches(&arg.value) {
                return Err(Error::Encoding(format!(
                    "argument {i}: value {:?} is not a {}",
                    arg.value, arg.ty
                )));
            }
        }
        let values = self.0.iter().map(|arg| arg.value.clone()).collect();
        Ok(DynSolValue::Tuple(values).abi_encode_params())
    }
}

/// Creation bytecode with constructor arguments appended.
#[derive(Clone, PartialEq, Eq)]
pub struct InitCode(Vec<u8>);

impl InitCode {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn hash(&self) -> [u8; 32] {
        keccak256(&self.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.0))
    }
}

impl fmt::Debug for InitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InitCode({} bytes, hash 0x{})", self.0.len(), hex::encode(self.hash()))
    }
}

impl AsRef<[u8]> for InitCode {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Concatenates `creation_code` and the encoded `args`. With no arguments the
/// creation code is returned unchanged.
pub fn assemble(creation_code: &[u8], args: &ConstructorArgs) -> Result<InitCode> {
    if args.is_empty() {
        return Ok(InitCode(creation_code.to_vec()));
    }
    let encoded = args.encode()?;
    let mut code = Vec::with_capacity(creation_code.len() + encoded.len());
    code.extend_from_slice(creation_code);
    code.extend_from_slice(&encoded);
    Ok(InitCode(code))
}

/// Decodes hex bytecode, with or without `0x`.
pub fn decode_hex(input: &str, what: &'static str) -> Result<Vec<u8>> {
    let h = input.trim();
    let h = h.strip_prefix("0x").unwrap_or(h);
    hex::decode(h).map_err(|e| Error::MalformedHex {
        what,
        reason: e.to_string(),
    })
}
