use cfreg_primitives::{le_bytes, u64_from_le, Address, Location};

use crate::{
    errors::CodecError,
    types::{Record, RECORD_LEN},
};

const fn read_exact<'a>(src: &mut &'a [u8], n: usize) -> Result<&'a [u8], CodecError> {
    if src.len() < n {
        return Err(CodecError::Short);
    }
    let (a, b) = src.split_at(n);
    *src = b;
    Ok(a)
}

fn read_array<const N: usize>(src: &mut &[u8]) -> Result<[u8; N], CodecError> {
    let mut out = [0u8; N];
    out.copy_from_slice(read_exact(src, N)?);
    Ok(out)
}

/// Canonical record encoding. Order is fixed; lengths are exact; no trailing bytes.
///
/// `LE64(id) || creator(20) || LE64(commit_time) || commitment(32) || revealed(1) || location(20)`
#[must_use]
pub fn encode_record(r: &Record) -> Vec<u8> {
    let mut v = Vec::with_capacity(RECORD_LEN);
    v.extend_from_slice(&le_bytes::<8>(u128::from(r.id)));          // 8
    v.extend_from_slice(&r.creator.0);                                // 20
    v.extend_from_slice(&le_bytes::<8>(u128::from(r.commit_time))); // 8
    v.extend_from_slice(&r.commitment);                               // 32
    v.push(u8::from(r.is_revealed()));                                // 1
    v.extend_from_slice(&r.location.unwrap_or(Location::ZERO).0);     // 20
    v
}

/// Decode a record, rejecting any encoding [`encode_record`] would not produce.
pub fn decode_record(mut src: &[u8]) -> Result<Record, CodecError> {
    if src.len() > RECORD_LEN {
        return Err(CodecError::Trailing);
    }
    let id = u64_from_le(read_exact(&mut src, 8)?);
    if id == 0 {
        return Err(CodecError::Invalid("identifier 0 is reserved"));
    }
    let creator = Address(read_array(&mut src)?);
    let commit_time = u64_from_le(read_exact(&mut src, 8)?);
    let commitment = read_array(&mut src)?;
    let flag = read_exact(&mut src, 1)?[0];
    let location = Location(read_array(&mut src)?);
    let location = match (flag, location.is_zero()) {
        (0, true) => None,
        (1, false) => Some(location),
        (0, false) => return Err(CodecError::Invalid("location set on unrevealed record")),
        (1, true) => return Err(CodecError::Invalid("revealed record without location")),
        _ => return Err(CodecError::Invalid("revealed flag")),
    };
    Ok(Record { id, creator, commit_time, commitment, location })
}
