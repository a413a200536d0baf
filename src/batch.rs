//! Batch helpers: wrap or unwrap many independent blocks in one call.
//!
//! With the `parallel` feature the work is spread over Rayon's global pool.
//! Blocks share no state, so results are identical to calling
//! [`Envelope::wrap`] / [`Envelope::unwrap_owned`] one block at a time.
//! Output order always matches input order.  If any block fails, the first
//! error (in input order) is returned.

use crate::algorithm::AlgorithmId;
use crate::block::Envelope;
use crate::error::Result;

/// Wrap every chunk with algorithm `id`.
pub fn wrap_all(env: &Envelope<'_>, id: AlgorithmId, chunks: &[&[u8]]) -> Result<Vec<Vec<u8>>> {
    // Unknown ids fail once, up front, even for an empty batch.
    env.registry().resolve(id)?;

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        let results: Vec<Result<Vec<u8>>> =
            chunks.par_iter().map(|chunk| env.wrap(id, chunk)).collect();
        first_error(results)
    }

    #[cfg(not(feature = "parallel"))]
    {
        chunks.iter().map(|chunk| env.wrap(id, chunk)).collect()
    }
}

/// Unwrap every block.  Blocks may carry different algorithm ids.
pub fn unwrap_all(env: &Envelope<'_>, blocks: &[&[u8]]) -> Result<Vec<Vec<u8>>> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        let results: Vec<Result<Vec<u8>>> =
            blocks.par_iter().map(|block| env.unwrap_owned(block)).collect();
        first_error(results)
    }

    #[cfg(not(feature = "parallel"))]
    {
        blocks.iter().map(|block| env.unwrap_owned(block)).collect()
    }
}

// Surface the first error in input order, not whichever thread failed first.
#[cfg(feature = "parallel")]
fn first_error(results: Vec<Result<Vec<u8>>>) -> Result<Vec<Vec<u8>>> {
    let mut out = Vec::with_capacity(results.len());
    for r in results {
        out.push(r?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::registry::Registry;

    #[test]
    fn batch_matches_single_calls() {
        let reg = Registry::builtin();
        let env = Envelope::new(&reg);
        let chunks: Vec<Vec<u8>> = (0..16u8).map(|i| vec![i; 100 * i as usize]).collect();
        let refs: Vec<&[u8]> = chunks.iter().map(Vec::as_slice).collect();

        for id in reg.ids() {
            let wrapped = wrap_all(&env, id, &refs).unwrap();
            for (w, c) in wrapped.iter().zip(&refs) {
                assert_eq!(w, &env.wrap(id, c).unwrap());
            }
            let block_refs: Vec<&[u8]> = wrapped.iter().map(Vec::as_slice).collect();
            assert_eq!(unwrap_all(&env, &block_refs).unwrap(), chunks);
        }
    }

    #[test]
    fn unknown_id_fails_for_empty_batch() {
        let reg = Registry::builder().build();
        let env = Envelope::new(&reg);
        assert!(matches!(
            wrap_all(&env, AlgorithmId(42), &[]),
            Err(Error::UnknownAlgorithm(AlgorithmId(42)))
        ));
    }

    #[test]
    fn first_error_in_input_order() {
        let reg = Registry::builder().build();
        let env = Envelope::new(&reg);
        let blocks: [&[u8]; 4] = [&[0, 1], &[], &[77, 1], &[0]];
        assert!(matches!(
            unwrap_all(&env, &blocks),
            Err(Error::MalformedBlock { len: 0 })
        ));
    }
}
