use color_eyre::Result;
use reed_solomon_benches::WrappedShard;

fn main() -> Result<()> {
	color_eyre::install()?;

	use reed_solomon_benches::{BYTES, TEST_DATA_CHUNK_SIZE};

	macro_rules! roundtrip {
		($module:ident) => {{
			use reed_solomon_benches::$module;
			reed_solomon_tester::roundtrip(
				$module::encode::<WrappedShard>,
				$module::reconstruct::<WrappedShard>,
				&BYTES[..TEST_DATA_CHUNK_SIZE],
				$module::MAX_ERASURES,
			)?;
			println!("{} roundtrip ok", stringify!($module));
		}};
	}

	roundtrip!(cauchy);
	roundtrip!(cauchy_pcm);
	roundtrip!(lrc);
	roundtrip!(msr);
	roundtrip!(msr_repair);

	Ok(())
}
