#[cfg(feature = "media-ffmpeg")]
mod media_pipeline {
    use std::{
        path::{Path, PathBuf},
        process::Command,
        time::Duration,
    };

    use grant_visuals::{
        FfmpegTranscoder, GifJob, Report, TranscodeOutcome, Transcoder, captured, convert_to_gif,
        is_ffmpeg_on_path,
    };

    fn synth_clip(root: &Path) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(root)?;

        let video_path = root.join("clip.mp4");
        let status = Command::new("ffmpeg")
            .args([
                "-v",
                "error",
                "-y",
                "-f",
                "lavfi",
                "-i",
                "testsrc=size=160x90:rate=30",
                "-t",
                "1",
                "-pix_fmt",
                "yuv420p",
            ])
            .arg(&video_path)
            .status()?;
        anyhow::ensure!(status.success(), "ffmpeg failed creating clip.mp4");
        Ok(video_path)
    }

    #[test]
    fn mp4_becomes_looping_gif() -> anyhow::Result<()> {
        if !is_ffmpeg_on_path() {
            eprintln!("skipping: ffmpeg not on PATH");
            return Ok(());
        }

        let root = PathBuf::from("target").join("media_pipeline");
        let input = synth_clip(&root)?;
        let output = root.join("clip.gif");
        let _ = std::fs::remove_file(&output);

        let mut job = GifJob::new(input).with_output(output.clone());
        job.width = 80;
        job.fps = 10;

        let mut r = Report::new(Vec::new());
        let rep = convert_to_gif(&job, &FfmpegTranscoder::new(), &mut r);
        let text = captured(r);

        assert!(rep.success, "conversion failed:\n{text}");
        assert!(text.contains("[SUCCESS] GIF created:"));
        let bytes = std::fs::read(&output)?;
        assert!(bytes.starts_with(b"GIF89a"));
        assert_eq!(rep.output_bytes, Some(bytes.len() as u64));
        Ok(())
    }

    #[test]
    fn garbage_input_reports_ffmpeg_diagnostic() -> anyhow::Result<()> {
        if !is_ffmpeg_on_path() {
            eprintln!("skipping: ffmpeg not on PATH");
            return Ok(());
        }

        let root = PathBuf::from("target").join("media_pipeline_garbage");
        std::fs::create_dir_all(&root)?;
        let input = root.join("garbage.mp4");
        std::fs::write(&input, b"definitely not a video container")?;

        let mut job = GifJob::new(input).with_output(root.join("garbage.gif"));
        job.timeout = Duration::from_secs(30);

        match FfmpegTranscoder::new().transcode(&job)? {
            TranscodeOutcome::Exited {
                success, stderr, ..
            } => {
                assert!(!success);
                assert!(!stderr.is_empty());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        Ok(())
    }
}
