//! 简化的 Protobuf 编码，仅覆盖 Cosmos SDK 直接sign模式需要的消息
//!
//! proto3 语义：空字符串、空字节和 0 值标量不写入。

/// Protobuf varint 编码
pub fn encode_varint(buf: &mut Vec<u8>, mut value: u64) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf.push(byte);
        if value == 0 {
            break;
        }
    }
}

fn tag(buf: &mut Vec<u8>, field_num: u32, wire_type: u32) {
    encode_varint(buf, ((field_num << 3) | wire_type) as u64);
}

/// Length-delimited field (bytes, string or embedded message).
pub fn bytes_field(buf: &mut Vec<u8>, field_num: u32, value: &[u8]) {
    tag(buf, field_num, 2);
    encode_varint(buf, value.len() as u64);
    buf.extend_from_slice(value);
}

/// 编码字符串字段
pub fn string_field(buf: &mut Vec<u8>, field_num: u32, value: &str) {
    if !value.is_empty() {
        bytes_field(buf, field_num, value.as_bytes());
    }
}

pub fn uint64_field(buf: &mut Vec<u8>, field_num: u32, value: u64) {
    if value != 0 {
        tag(buf, field_num, 0);
        encode_varint(buf, value);
    }
}

pub const MSG_SEND_TYPE_URL: &str = "/cosmos.bank.v1beta1.MsgSend";
pub const SECP256K1_PUBKEY_TYPE_URL: &str = "/cosmos.crypto.secp256k1.PubKey";
/// SIGN_MODE_DIRECT
pub const SIGN_MODE_DIRECT: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

impl Coin {
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        string_field(&mut buf, 1, &self.denom);
        string_field(&mut buf, 2, &self.amount);
        buf
    }
}

/// google.protobuf.Any
pub fn any(type_url: &str, value: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    string_field(&mut buf, 1, type_url);
    bytes_field(&mut buf, 2, value);
    buf
}

/// cosmos.bank.v1beta1.MsgSend
pub fn msg_send(from: &str, to: &str, amount: &[Coin]) -> Vec<u8> {
    let mut buf = Vec::new();
    string_field(&mut buf, 1, from);
    string_field(&mut buf, 2, to);
    for coin in amount {
        bytes_field(&mut buf, 3, &coin.encode());
    }
    buf
}

/// cosmos.tx.v1beta1.TxBody with Any-wrapped messages.
pub fn tx_body(messages: &[Vec<u8>], memo: &str) -> Vec<u8> {
    let mut buf = Vec::new();
    for msg in messages {
        bytes_field(&mut buf, 1, msg);
    }
    string_field(&mut buf, 2, memo);
    buf
}

/// cosmos.tx.v1beta1.AuthInfo with a single SIGN_MODE_DIRECT signer.
pub fn auth_info(public_key: &[u8], sequence: u64, fee: &[Coin], gas_limit: u64) -> Vec<u8> {
    let mut pk = Vec::new();
    bytes_field(&mut pk, 1, public_key);

    let mut single = Vec::new();
    uint64_field(&mut single, 1, SIGN_MODE_DIRECT);
    let mut mode_info = Vec::new();
    bytes_field(&mut mode_info, 1, &single);

    let mut signer_info = Vec::new();
    bytes_field(&mut signer_info, 1, &any(SECP256K1_PUBKEY_TYPE_URL, &pk));
    bytes_field(&mut signer_info, 2, &mode_info);
    uint64_field(&mut signer_info, 3, sequence);

    let mut fee_msg = Vec::new();
    for coin in fee {
        bytes_field(&mut fee_msg, 1, &coin.encode());
    }
    uint64_field(&mut fee_msg, 2, gas_limit);

    let mut buf = Vec::new();
    bytes_field(&mut buf, 1, &signer_info);
    bytes_field(&mut buf, 2, &fee_msg);
    buf
}

/// cosmos.tx.v1beta1.SignDoc
pub fn sign_doc(body: &[u8], auth_info: &[u8], chain_id: &str, account_number: u64) -> Vec<u8> {
    let mut buf = Vec::new();
    bytes_field(&mut buf, 1, body);
    bytes_field(&mut buf, 2, auth_info);
    string_field(&mut buf, 3, chain_id);
    uint64_field(&mut buf, 4, account_number);
    buf
}

/// cosmos.tx.v1beta1.TxRaw
pub fn tx_raw(body: &[u8], auth_info: &[u8], signature: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    bytes_field(&mut buf, 1, body);
    bytes_field(&mut buf, 2, auth_info);
    bytes_field(&mut buf, 3, signature);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_varint_encoding() {
        let mut buf = Vec::new();
        encode_varint(&mut buf, 127);
        assert_eq!(buf, vec![0x7F]);

        buf.clear();
        encode_varint(&mut buf, 300);
        assert_eq!(buf, vec![0xAC, 0x02]);

        buf.clear();
        encode_varint(&mut buf, 200_000);
        assert_eq!(buf, vec![0xC0, 0x9A, 0x0C]);
    }

    #[test]
    fn test_default_values_are_omitted() {
        let mut buf = Vec::new();
        string_field(&mut buf, 2, "");
        uint64_field(&mut buf, 4, 0);
        assert!(buf.is_empty());
        assert_eq!(tx_body(&[], ""), Vec::<u8>::new());
    }

    #[test]
    fn test_coin_layout() {
        let coin = Coin { denom: "uatom".into(), amount: "5000".into() };
        assert_eq!(hex::encode(coin.encode()), "0a057561746f6d120435303030");
    }
}
