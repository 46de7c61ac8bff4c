//! LM and NTLMv1 challenge-response authentication.
//!
//! This client never negotiates extended security (no SPNEGO/NTLMSSP), so
//! the only scheme it needs is the classic pre-NTLMv2 response: a 16-byte
//! hash (LM or NTLM) padded to 21 bytes, split into three 7-byte DES keys,
//! each used to encrypt the server's 8-byte challenge. The three 8-byte
//! outputs concatenate into the 24-byte response sent in
//! `SMB_COM_SESSION_SETUP_ANDX`.

use des::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use des::Des;
use md4::{Digest, Md4};

/// Fixed plaintext DES-encrypted with the two halves of the (padded,
/// uppercased) password to produce the 16-byte LM hash.
const LM_MAGIC: &[u8; 8] = b"KGS!@#$%";

/// Expands a 7-byte (56-bit) key into the 8-byte form DES expects, with an
/// odd-parity bit inserted as the low bit of each byte.
fn expand_des_key(key7: &[u8; 7]) -> [u8; 8] {
    let mut key = [0u8; 8];
    key[0] = key7[0];
    key[1] = (key7[0] << 7) | (key7[1] >> 1);
    key[2] = (key7[1] << 6) | (key7[2] >> 2);
    key[3] = (key7[2] << 5) | (key7[3] >> 3);
    key[4] = (key7[3] << 4) | (key7[4] >> 4);
    key[5] = (key7[4] << 3) | (key7[5] >> 5);
    key[6] = (key7[5] << 2) | (key7[6] >> 6);
    key[7] = key7[6] << 1;
    for b in key.iter_mut() {
        *b = set_odd_parity(*b);
    }
    key
}

/// Sets the low bit of `b` so the byte has odd parity (an odd number of
/// set bits overall). The caller has already shifted the real key bits
/// into the top 7 bits, leaving bit 0 free for this.
fn set_odd_parity(b: u8) -> u8 {
    if b.count_ones() % 2 == 0 {
        b | 1
    } else {
        b & 0xfe
    }
}

fn des_encrypt_block(key7: &[u8; 7], data: &[u8; 8]) -> [u8; 8] {
    let key8 = expand_des_key(key7);
    let cipher = Des::new(GenericArray::from_slice(&key8));
    let mut block = GenericArray::clone_from_slice(data);
    cipher.encrypt_block(&mut block);
    let mut out = [0u8; 8];
    out.copy_from_slice(&block);
    out
}

/// Encrypts `challenge` with each of three 7-byte keys sliced out of a
/// 21-byte (zero-padded) 16-byte hash, producing the 24-byte response.
fn challenge_response(hash16: &[u8; 16], challenge: &[u8; 8]) -> [u8; 24] {
    let mut padded = [0u8; 21];
    padded[..16].copy_from_slice(hash16);

    let mut out = [0u8; 24];
    out[0..8].copy_from_slice(&des_encrypt_block(padded[0..7].try_into().unwrap(), challenge));
    out[8..16].copy_from_slice(&des_encrypt_block(padded[7..14].try_into().unwrap(), challenge));
    out[16..24].copy_from_slice(&des_encrypt_block(padded[14..21].try_into().unwrap(), challenge));
    out
}

/// Computes the LM hash of `password`: uppercased, truncated/zero-padded
/// to 14 bytes, split into two 7-byte halves each used to DES-encrypt
/// [`LM_MAGIC`].
pub fn lm_hash(password: &str) -> [u8; 16] {
    let mut oem = password.to_uppercase().into_bytes();
    oem.truncate(14);
    oem.resize(14, 0);

    let mut out = [0u8; 16];
    out[0..8].copy_from_slice(&des_encrypt_block(oem[0..7].try_into().unwrap(), LM_MAGIC));
    out[8..16].copy_from_slice(&des_encrypt_block(oem[7..14].try_into().unwrap(), LM_MAGIC));
    out
}

/// Computes the NTLM hash of `password`: MD4 over the UTF-16LE encoding.
pub fn ntlm_hash(password: &str) -> [u8; 16] {
    let utf16: Vec<u8> = password
        .encode_utf16()
        .flat_map(u16::to_le_bytes)
        .collect();
    let mut hasher = Md4::new();
    hasher.update(&utf16);
    let digest = hasher.finalize();
    let mut out = [0u8; 16];
    out.copy_from_slice(&digest);
    out
}

/// Computes the 24-byte LM challenge response for `password` against the
/// server's 8-byte `challenge`.
pub fn lm_response(password: &str, challenge: &[u8; 8]) -> [u8; 24] {
    challenge_response(&lm_hash(password), challenge)
}

/// Computes the 24-byte NTLMv1 challenge response for `password` against
/// the server's 8-byte `challenge`.
pub fn ntlm_response(password: &str, challenge: &[u8; 8]) -> [u8; 24] {
    challenge_response(&ntlm_hash(password), challenge)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ntlm_hash_of_password_matches_known_answer() {
        let hash = ntlm_hash("password");
        assert_eq!(
            hash,
            [
                0x88, 0x46, 0xf7, 0xea, 0xee, 0x8f, 0xb1, 0x17, 0xad, 0x06, 0xbd, 0xd8, 0x30,
                0xb7, 0x58, 0x6c,
            ]
        );
    }

    #[test]
    fn lm_hash_of_empty_password_matches_known_answer() {
        // The well-known "no LM hash" constant: both halves of the padded,
        // all-zero password key encrypt KGS!@#$% to the same block.
        let hash = lm_hash("");
        assert_eq!(
            hash,
            [
                0xaa, 0xd3, 0xb4, 0x35, 0xb5, 0x14, 0x04, 0xee, 0xaa, 0xd3, 0xb4, 0x35, 0xb5,
                0x14, 0x04, 0xee,
            ]
        );
    }

    #[test]
    fn responses_are_24_bytes_and_deterministic() {
        let challenge = [1, 2, 3, 4, 5, 6, 7, 8];
        let r1 = ntlm_response("hunter2", &challenge);
        let r2 = ntlm_response("hunter2", &challenge);
        assert_eq!(r1, r2);
        assert_eq!(r1.len(), 24);
        assert_ne!(lm_response("hunter2", &challenge), ntlm_response("hunter2", &challenge));
    }
}
