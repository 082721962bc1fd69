// CLI command implementation
use anyhow::Context;

use spc2wav::convert::{check_stream_size, load_input};
use spc2wav::emulator::{self, SpcEmulator};
use spc2wav::{build_tag, run_job, Job, SpcFilter, SpcMetadata, TagBuffer};

use super::config::Config;
use super::output::{Reporter, StatusReport};
use super::CliResult;

/// Convert the configured file using the linked emulator core
pub fn command_convert(config: &Config, reporter: &Reporter) -> CliResult<()> {
    convert_with(config, reporter, emulator::open)
}

/// Convert the configured file, loading the image with `open_emulator`
pub fn convert_with<O>(config: &Config, reporter: &Reporter, open_emulator: O) -> CliResult<()>
where
    O: FnOnce(&[u8]) -> spc2wav::Result<Box<dyn SpcEmulator>>,
{
    let options = config.job_options();

    let rom = load_input(&options.input)?;
    let meta = SpcMetadata::parse(&rom)
        .with_context(|| format!("reading {}", options.input.display()))?;
    let job = Job::resolve(&options, &meta);

    let mut tag = TagBuffer::new()?;
    build_tag(&mut tag, &meta, job.embed_tag)?;
    check_stream_size(&job, &options, tag.len())?;

    let mut emulator = open_emulator(&rom)
        .with_context(|| format!("loading {}", options.input.display()))?;
    drop(rom);
    let mut filter = SpcFilter::new();

    reporter.report(&StatusReport::new(&job, &meta, &tag), &mut std::io::stderr())?;

    let summary = run_job(&job, &tag, &mut emulator, &mut filter)
        .with_context(|| format!("writing {}", job.output.display()))?;

    reporter.print_success(&format!(
        "Wrote {} ({} frames, {} bytes{})",
        job.output.display(),
        summary.frames,
        summary.bytes,
        if summary.tag_written { ", ID3 tag" } else { "" }
    ));
    Ok(())
}
