//! Offuscamento reversibile delle password in transito
//!
//! Il client invia la password come numero scritto in base `ALPHABET.len()`; il server
//! la riporta in base 256, un carattere Latin-1 per cifra. Non è cifratura: serve solo a
//! non far viaggiare la password in chiaro nel body. A riposo la password è hashata con bcrypt.

const ALPHABET: &str =
    "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ!@#$%^&*()-_=+{}[]|:;<>,.?/~`";

/// Lunghezza massima accettata per una stringa offuscata. La conversione è quadratica
/// nella lunghezza e bcrypt usa comunque solo i primi 72 byte.
pub const MAX_ENCODED_LEN: usize = 256;

/// Converte un numero, dato come cifre big-endian in base `from`, in cifre big-endian in base `to`.
/// Lo zero produce un vettore vuoto.
fn convert_base(digits: impl IntoIterator<Item = u32>, from: u32, to: u32) -> Vec<u32> {
    // cifre little-endian del risultato parziale
    let mut out: Vec<u32> = Vec::new();
    for digit in digits {
        let mut carry = digit;
        for limb in out.iter_mut() {
            let value = *limb * from + carry;
            *limb = value % to;
            carry = value / to;
        }
        while carry > 0 {
            out.push(carry % to);
            carry /= to;
        }
    }
    out.reverse();
    out
}

fn alphabet_base() -> u32 {
    ALPHABET.len() as u32
}

/// Decodifica una stringa offuscata.
///
/// Ritorna `None` se l'input è vuoto, più lungo di [`MAX_ENCODED_LEN`] o contiene
/// caratteri fuori dall'alfabeto.
/// Un valore numerico nullo (es. `"0"`) decodifica alla stringa vuota.
pub fn decode_string(encoded: &str) -> Option<String> {
    if encoded.is_empty() || encoded.len() > MAX_ENCODED_LEN {
        return None;
    }

    let digits = encoded
        .chars()
        .map(|c| ALPHABET.find(c).map(|index| index as u32))
        .collect::<Option<Vec<u32>>>()?;

    let bytes = convert_base(digits, alphabet_base(), 256);
    Some(bytes.into_iter().map(|b| char::from(b as u8)).collect())
}

/// Operazione inversa di [`decode_string`], usata dai client.
///
/// Ritorna `None` se un carattere non è rappresentabile in Latin-1. I byte nulli
/// iniziali non sopravvivono alla conversione.
pub fn encode_string(plain: &str) -> Option<String> {
    let bytes = plain
        .chars()
        .map(|c| u8::try_from(u32::from(c)).ok().map(u32::from))
        .collect::<Option<Vec<u32>>>()?;

    let digits = convert_base(bytes, 256, alphabet_base());
    if digits.is_empty() {
        return Some(ALPHABET[..1].to_string());
    }

    let symbols = ALPHABET.as_bytes();
    Some(
        digits
            .into_iter()
            .map(|d| char::from(symbols[d as usize]))
            .collect(),
    )
}
