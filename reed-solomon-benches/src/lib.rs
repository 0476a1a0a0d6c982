pub use reed_solomon_msr::WrappedShard;
pub use reed_solomon_tester::{BYTES, TEST_DATA_CHUNK_SIZE};

/// Declare a module binding one code configuration to the
/// `encode(payload)` / `reconstruct(shards, payload_len)` shape the
/// round trip helpers expect.
macro_rules! code_module {
	($name:ident, $ctor:expr, $strategy:expr, $max_erasures:expr) => {
		pub mod $name {
			use reed_solomon_msr::{ErasureCode, Result, Shard, Strategy};

			/// Units the round trip may lose.
			pub const MAX_ERASURES: usize = $max_erasures;

			pub fn code() -> impl ErasureCode {
				$ctor.expect("bench parameters are valid. qed")
			}

			pub fn encode<S: Shard>(payload: &[u8]) -> Result<Vec<S>> {
				reed_solomon_msr::encode_payload(&code(), payload)
			}

			pub fn reconstruct<S: Shard>(shards: Vec<Option<S>>, payload_len: usize) -> Result<Vec<u8>> {
				reed_solomon_msr::reconstruct_payload(&code(), shards, payload_len, $strategy)
			}
		}
	};
}

code_module!(cauchy, reed_solomon_msr::ReedSolomon::new(14, 10), Strategy::Selection, 4);
code_module!(cauchy_pcm, reed_solomon_msr::ReedSolomon::new(14, 10), Strategy::ParityCheck, 4);
code_module!(lrc, reed_solomon_msr::Lrc::new(12, 2, 2), Strategy::ParityCheck, 3);
code_module!(msr, reed_solomon_msr::MsrCode::new(8, 6), Strategy::Selection, 2);
code_module!(msr_repair, reed_solomon_msr::MsrCode::new(8, 6), Strategy::ParityCheck, 1);
