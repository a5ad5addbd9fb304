//! Concurrent Merkle tree account sizing
//!
//! The account-compression program stores a tree as a fixed-size account:
//! a header, three `u64` counters, a ring buffer of change logs, the
//! right-most proof path and an optional canopy. The size only depends on
//! the tree shape, so it can be computed before the account is created.

/// Account type discriminator plus header version byte
const ACCOUNT_DISCRIMINATOR_SIZE: usize = 2;
/// `ConcurrentMerkleTreeHeaderDataV1`
const HEADER_V1_SIZE: usize = 54;
/// `sequence_number`, `active_index`, `buffer_size`
const TREE_COUNTERS_SIZE: usize = 8 + 8 + 8;
const NODE_SIZE: usize = 32;
/// Root (or leaf) node plus `index: u32` and `_padding: u32`
const PATH_OVERHEAD: usize = NODE_SIZE + 4 + 4;

/// (max_depth, max_buffer_size) pairs the account-compression program accepts
pub const VALID_DEPTH_BUFFER_PAIRS: &[(u32, u32)] = &[
    (3, 8),
    (5, 8),
    (6, 16),
    (7, 16),
    (8, 16),
    (9, 16),
    (10, 32),
    (11, 32),
    (12, 32),
    (13, 32),
    (14, 64),
    (14, 256),
    (14, 1024),
    (14, 2048),
    (15, 64),
    (16, 64),
    (17, 64),
    (18, 64),
    (19, 64),
    (20, 64),
    (20, 256),
    (20, 1024),
    (20, 2048),
    (24, 64),
    (24, 256),
    (24, 512),
    (24, 1024),
    (24, 2048),
    (26, 512),
    (26, 1024),
    (26, 2048),
    (30, 512),
    (30, 1024),
    (30, 2048),
];

/// Whether the program accepts this tree shape
pub fn is_supported(max_depth: u32, max_buffer_size: u32) -> bool {
    VALID_DEPTH_BUFFER_PAIRS.contains(&(max_depth, max_buffer_size))
}

pub fn validate_tree_params(max_depth: u32, max_buffer_size: u32) -> Result<(), String> {
    if is_supported(max_depth, max_buffer_size) {
        Ok(())
    } else {
        Err(format!(
            "unsupported tree shape: max_depth={} max_buffer_size={}",
            max_depth, max_buffer_size
        ))
    }
}

/// Bytes of one change log / path entry for a tree of `max_depth`
fn path_size(max_depth: usize) -> usize {
    NODE_SIZE * max_depth + PATH_OVERHEAD
}

/// Bytes of the cached upper levels of the tree
///
/// Saturates at `usize::MAX` for depths no account could hold.
pub fn canopy_size(canopy_depth: u32) -> usize {
    if canopy_depth == 0 {
        return 0;
    }
    match 1usize.checked_shl(canopy_depth.saturating_add(1)) {
        Some(leaves) => (leaves - 2).saturating_mul(NODE_SIZE),
        None => usize::MAX,
    }
}

/// Size in bytes of a tree account with the given shape
///
/// Depth 3, buffer 8 and no canopy yields 1304 bytes.
pub fn merkle_tree_account_size(max_depth: u32, max_buffer_size: u32, canopy_depth: u32) -> usize {
    let depth = max_depth as usize;
    let change_logs = max_buffer_size as usize * path_size(depth);
    let rightmost_proof = path_size(depth);

    (ACCOUNT_DISCRIMINATOR_SIZE
        + HEADER_V1_SIZE
        + TREE_COUNTERS_SIZE
        + change_logs
        + rightmost_proof)
        .saturating_add(canopy_size(canopy_depth))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_size() {
        assert_eq!(merkle_tree_account_size(3, 8, 0), 1304);
    }

    #[test]
    fn test_canopy_size_saturates() {
        assert_eq!(canopy_size(1), 2 * NODE_SIZE);
        assert_eq!(canopy_size(63), usize::MAX);
        assert_eq!(canopy_size(64), usize::MAX);
        assert_eq!(canopy_size(u32::MAX), usize::MAX);
        assert_eq!(merkle_tree_account_size(3, 8, 64), usize::MAX);
    }

    #[test]
    fn test_larger_trees() {
        // 56 + 24 + 64 * (14 * 32 + 40) + (14 * 32 + 40)
        assert_eq!(merkle_tree_account_size(14, 64, 0), 31_800);
        assert_eq!(
            merkle_tree_account_size(14, 64, 10),
            31_800 + ((1 << 11) - 2) * 32
        );
    }

    #[test]
    fn test_canopy_size() {
        assert_eq!(canopy_size(0), 0);
        assert_eq!(canopy_size(1), 64);
        assert_eq!(canopy_size(2), 192);
    }

    #[test]
    fn test_supported_pairs() {
        assert!(is_supported(3, 8));
        assert!(is_supported(30, 2048));
        assert!(!is_supported(3, 16));
        assert!(!is_supported(4, 8));
        assert!(validate_tree_params(4, 8).is_err());
    }

    #[test]
    fn test_size_strictly_increasing_over_supported_pairs() {
        for &(depth, buffer) in VALID_DEPTH_BUFFER_PAIRS {
            let size = merkle_tree_account_size(depth, buffer, 0);
            assert!(merkle_tree_account_size(depth + 1, buffer, 0) > size);
            assert!(merkle_tree_account_size(depth, buffer + 1, 0) > size);
        }
    }
}
