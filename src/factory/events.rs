//! Reads the deployed address out of a factory receipt.

use alloy_sol_types::SolEvent;
use tracing::warn;

use super::abi::Deployed;
use crate::chain::{Log, TransactionReceipt};
use crate::crypto::Address;
use crate::error::{Error, Result};

fn decode_deployed(log: &Log) -> Option<Address> {
    if log.topics.first() != Some(&Deployed::SIGNATURE_HASH) {
        return None;
    }
    Deployed::decode_raw_log(log.topics.iter().copied(), &log.data, true)
        .ok()
        .map(|event| Address::from(event.addr))
}

/// Returns the address from the first `Deployed` log emitted by `factory`.
///
/// Logs from other emitters are skipped, so a deployed contract that emits its
/// own `Deployed` event from its constructor cannot shadow the factory's. A
/// second factory event is unexpected and only logged.
pub fn parse_deployed_address(receipt: &TransactionReceipt, factory: &Address) -> Result<Address> {
    let mut deployed = receipt
        .logs
        .iter()
        .filter(|log| log.address == *factory)
        .filter_map(decode_deployed);

    let address = deployed.next().ok_or(Error::EventNotFound {
        tx_hash: receipt.transaction_hash.0,
    })?;

    let extra = deployed.count();
    if extra > 0 {
        warn!(
            tx_hash = %receipt.transaction_hash,
            %address,
            extra,
            "multiple Deployed events, using the first"
        );
    }
    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Bytes, B256};

    const FACTORY: Address = Address::from_bytes([0xfa; 20]);

    fn deployed_log(emitter: Address, addr: Address) -> Log {
        Log {
            address: emitter,
            topics: vec![Deployed::SIGNATURE_HASH, B256::from(addr.to_word())],
            data: Bytes::new(),
        }
    }

    fn receipt(logs: Vec<Log>) -> TransactionReceipt {
        TransactionReceipt {
            transaction_hash: B256::repeat_byte(0xab),
            status: true,
            contract_address: None,
            block_number: 1,
            logs,
        }
    }

    #[test]
    fn test_single_event() {
        let target = Address::from_bytes([0x42; 20]);
        let r = receipt(vec![deployed_log(FACTORY, target)]);
        assert_eq!(parse_deployed_address(&r, &FACTORY).unwrap(), target);
    }

    #[test]
    fn test_first_event_wins() {
        let first = Address::from_bytes([0x01; 20]);
        let second = Address::from_bytes([0x02; 20]);
        let r = receipt(vec![deployed_log(FACTORY, first), deployed_log(FACTORY, second)]);
        assert_eq!(parse_deployed_address(&r, &FACTORY).unwrap(), first);
    }

    #[test]
    fn test_other_emitters_ignored() {
        let decoy = Address::from_bytes([0xdd; 20]);
        let target = Address::from_bytes([0x42; 20]);
        let r = receipt(vec![deployed_log(decoy, decoy), deployed_log(FACTORY, target)]);
        assert_eq!(parse_deployed_address(&r, &FACTORY).unwrap(), target);
    }

    #[test]
    fn test_unrelated_logs_skipped() {
        let target = Address::from_bytes([0x42; 20]);
        let transfer = Log {
            address: FACTORY,
            topics: vec![B256::repeat_byte(0x01)],
            data: Bytes::from(vec![0u8; 32]),
        };
        let r = receipt(vec![transfer, deployed_log(FACTORY, target)]);
        assert_eq!(parse_deployed_address(&r, &FACTORY).unwrap(), target);
    }

    #[test]
    fn test_missing_event() {
        let r = receipt(Vec::new());
        assert!(matches!(
            parse_deployed_address(&r, &FACTORY),
            Err(Error::EventNotFound { tx_hash }) if tx_hash == [0xab; 32]
        ));
    }
}
