//! Content encryption: AES-GCM AEAD and the AES-CBC-HMAC generic
//! composition of RFC 7518 §5.2.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use aes_gcm::{AeadInPlace, Aes128Gcm, Aes256Gcm, AesGcm, KeyInit, Nonce};
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;

use crate::error::{DecryptError, EncryptError, KeyError};

use super::Encryption;

type Aes192Gcm = AesGcm<aes::Aes192, aes_gcm::aead::consts::U12>;

pub(crate) struct Sealed {
    pub ciphertext: Vec<u8>,
    pub tag: Vec<u8>,
}

/// Encrypts `plaintext` under `cek`/`iv`, authenticating `aad`.
pub(crate) fn encrypt(
    enc: Encryption,
    cek: &[u8],
    iv: &[u8],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<Sealed, EncryptError> {
    check_lengths(enc, cek, iv).map_err(EncryptError::Key)?;
    if enc.is_gcm() {
        let mut buffer = plaintext.to_vec();
        let tag = match enc {
            Encryption::A128Gcm => Aes128Gcm::new_from_slice(cek)?
                .encrypt_in_place_detached(Nonce::from_slice(iv), aad, &mut buffer)?,
            Encryption::A192Gcm => Aes192Gcm::new_from_slice(cek)?
                .encrypt_in_place_detached(Nonce::from_slice(iv), aad, &mut buffer)?,
            Encryption::A256Gcm => Aes256Gcm::new_from_slice(cek)?
                .encrypt_in_place_detached(Nonce::from_slice(iv), aad, &mut buffer)?,
            _ => unreachable!("not a GCM algorithm: {enc}"),
        };
        return Ok(Sealed {
            ciphertext: buffer,
            tag: tag.to_vec(),
        });
    }
    // CBC-HMAC: the first half of the CEK keys the MAC, the second half
    // keys the cipher
    let (mac_key, enc_key) = cek.split_at(cek.len() / 2);
    let ciphertext = match enc {
        Encryption::A128CbcHs256 => cbc::Encryptor::<aes::Aes128>::new_from_slices(enc_key, iv)?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        Encryption::A192CbcHs384 => cbc::Encryptor::<aes::Aes192>::new_from_slices(enc_key, iv)?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        Encryption::A256CbcHs512 => cbc::Encryptor::<aes::Aes256>::new_from_slices(enc_key, iv)?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        _ => unreachable!("not a CBC-HMAC algorithm: {enc}"),
    };
    let tag = cbc_hmac_tag(enc, mac_key, aad, iv, &ciphertext).map_err(EncryptError::Key)?;
    Ok(Sealed { ciphertext, tag })
}

/// Decrypts and authenticates. The MAC comparison is constant-time, GCM
/// tag verification happens inside the primitive, and no plaintext
/// escapes a failed authentication.
pub(crate) fn decrypt(
    enc: Encryption,
    cek: &[u8],
    iv: &[u8],
    aad: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
) -> Result<Vec<u8>, DecryptError> {
    check_lengths(enc, cek, iv).map_err(DecryptError::Key)?;
    if enc.is_gcm() {
        if tag.len() != enc.tag_len() {
            return Err(DecryptError::Verification);
        }
        let mut buffer = ciphertext.to_vec();
        let tag = aes_gcm::Tag::from_slice(tag);
        match enc {
            Encryption::A128Gcm => Aes128Gcm::new_from_slice(cek)?
                .decrypt_in_place_detached(Nonce::from_slice(iv), aad, &mut buffer, tag)?,
            Encryption::A192Gcm => Aes192Gcm::new_from_slice(cek)?
                .decrypt_in_place_detached(Nonce::from_slice(iv), aad, &mut buffer, tag)?,
            Encryption::A256Gcm => Aes256Gcm::new_from_slice(cek)?
                .decrypt_in_place_detached(Nonce::from_slice(iv), aad, &mut buffer, tag)?,
            _ => unreachable!("not a GCM algorithm: {enc}"),
        }
        return Ok(buffer);
    }
    let (mac_key, enc_key) = cek.split_at(cek.len() / 2);
    let expected = cbc_hmac_tag(enc, mac_key, aad, iv, ciphertext).map_err(DecryptError::Key)?;
    // the tag comparison must not leak how long a matching prefix the
    // presented tag has; mismatched lengths compare unequal
    if expected.ct_eq(tag).unwrap_u8() != 1 {
        return Err(DecryptError::Verification);
    }
    let plaintext = match enc {
        Encryption::A128CbcHs256 => cbc::Decryptor::<aes::Aes128>::new_from_slices(enc_key, iv)?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| DecryptError::Verification)?,
        Encryption::A192CbcHs384 => cbc::Decryptor::<aes::Aes192>::new_from_slices(enc_key, iv)?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| DecryptError::Verification)?,
        Encryption::A256CbcHs512 => cbc::Decryptor::<aes::Aes256>::new_from_slices(enc_key, iv)?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| DecryptError::Verification)?,
        _ => unreachable!("not a CBC-HMAC algorithm: {enc}"),
    };
    Ok(plaintext)
}

/// `HMAC(mac_key, AAD || IV || C || AL)` truncated to the left half,
/// where AL is the AAD bit length as a 64-bit big-endian integer.
fn cbc_hmac_tag(
    enc: Encryption,
    mac_key: &[u8],
    aad: &[u8],
    iv: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>, KeyError> {
    let al = ((aad.len() as u64) * 8).to_be_bytes();
    let full = match enc {
        Encryption::A128CbcHs256 => {
            let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(mac_key).map_err(KeyError::from)?;
            mac.update(aad);
            mac.update(iv);
            mac.update(ciphertext);
            mac.update(&al);
            mac.finalize().into_bytes().to_vec()
        }
        Encryption::A192CbcHs384 => {
            let mut mac = <Hmac<Sha384> as Mac>::new_from_slice(mac_key).map_err(KeyError::from)?;
            mac.update(aad);
            mac.update(iv);
            mac.update(ciphertext);
            mac.update(&al);
            mac.finalize().into_bytes().to_vec()
        }
        Encryption::A256CbcHs512 => {
            let mut mac = <Hmac<Sha512> as Mac>::new_from_slice(mac_key).map_err(KeyError::from)?;
            mac.update(aad);
            mac.update(iv);
            mac.update(ciphertext);
            mac.update(&al);
            mac.finalize().into_bytes().to_vec()
        }
        _ => unreachable!("not a CBC-HMAC algorithm: {enc}"),
    };
    Ok(full[..enc.tag_len()].to_vec())
}

fn check_lengths(enc: Encryption, cek: &[u8], iv: &[u8]) -> Result<(), KeyError> {
    if cek.len() != enc.key_len() {
        return Err(KeyError(format!(
            "{enc} requires a {}-byte key, got {}",
            enc.key_len(),
            cek.len()
        )));
    }
    if iv.len() != enc.iv_len() {
        return Err(KeyError(format!(
            "{enc} requires a {}-byte IV, got {}",
            enc.iv_len(),
            iv.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 7518 appendix B.1
    #[test]
    fn test_rfc7518_b1_a128cbc_hs256() {
        let key = hex::decode(
            "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f",
        )
        .unwrap();
        let plaintext = hex::decode(
            "41206369706865722073797374656d206d757374206e6f742062652072657175\
             6972656420746f206265207365637265742c20616e64206974206d7573742062\
             652061626c6520746f2066616c6c20696e746f207468652068616e6473206f66\
             2074686520656e656d7920776974686f757420696e636f6e76656e69656e6365",
        )
        .unwrap();
        let iv = hex::decode("1af38c2dc2b96ffdd86694092341bc04").unwrap();
        let aad = hex::decode(
            "546865207365636f6e64207072696e6369706c65206f66204175677573746520\
             4b6572636b686f666673",
        )
        .unwrap();
        let expected_ciphertext = hex::decode(
            "c80edfa32ddf39d5ef00c0b468834279a2e46a1b8049f792f76bfe54b903a9c9\
             a94ac9b47ad2655c5f10f9aef71427e2fc6f9b3f399a221489f16362c7032336\
             09d45ac69864e3321cf82935ac4096c86e133314c54019e8ca7980dfa4b9cf1b\
             384c486f3a54c51078158ee5d79de59fbd34d848b3d69550a67646344427ade5\
             4b8851ffb598f7f80074b9473c82e2db",
        )
        .unwrap();
        let expected_tag = hex::decode("652c3fa36b0a7c5b3219fab3a30bc1c4").unwrap();

        let sealed = encrypt(Encryption::A128CbcHs256, &key, &iv, &aad, &plaintext).unwrap();
        assert_eq!(sealed.ciphertext, expected_ciphertext);
        assert_eq!(sealed.tag, expected_tag);

        let opened = decrypt(
            Encryption::A128CbcHs256,
            &key,
            &iv,
            &aad,
            &sealed.ciphertext,
            &sealed.tag,
        )
        .unwrap();
        assert_eq!(opened, plaintext);
    }

    #[test]
    fn test_tampered_ciphertext_is_rejected() {
        let cek = vec![1u8; 32];
        let iv = vec![2u8; 16];
        let sealed = encrypt(Encryption::A128CbcHs256, &cek, &iv, b"aad", b"secret").unwrap();

        let mut bad = sealed.ciphertext.clone();
        bad[0] ^= 1;
        assert!(matches!(
            decrypt(Encryption::A128CbcHs256, &cek, &iv, b"aad", &bad, &sealed.tag),
            Err(DecryptError::Verification)
        ));

        let mut bad_tag = sealed.tag.clone();
        bad_tag[0] ^= 1;
        assert!(matches!(
            decrypt(
                Encryption::A128CbcHs256,
                &cek,
                &iv,
                b"aad",
                &sealed.ciphertext,
                &bad_tag
            ),
            Err(DecryptError::Verification)
        ));
    }

    #[test]
    fn test_gcm_round_trip_and_tamper() {
        for enc in [
            Encryption::A128Gcm,
            Encryption::A192Gcm,
            Encryption::A256Gcm,
        ] {
            let cek = vec![7u8; enc.key_len()];
            let iv = vec![9u8; enc.iv_len()];
            let sealed = encrypt(enc, &cek, &iv, b"header", b"plaintext").unwrap();
            assert_eq!(sealed.tag.len(), 16);
            let opened = decrypt(enc, &cek, &iv, b"header", &sealed.ciphertext, &sealed.tag)
                .unwrap();
            assert_eq!(opened, b"plaintext");

            let mut bad = sealed.tag.clone();
            bad[15] ^= 0x80;
            assert!(decrypt(enc, &cek, &iv, b"header", &sealed.ciphertext, &bad).is_err());
        }
    }

    #[test]
    fn test_wrong_cek_size() {
        let err = encrypt(Encryption::A256Gcm, &[0u8; 16], &[0u8; 12], b"", b"x");
        assert!(matches!(err, Err(EncryptError::Key(_))));
    }
}
