//! `dayshape reshape`: the full pipeline for one user.

use crate::render::{self, Style};
use crate::{ReshapeArgs, Session, print_json};
use anyhow::Result;
use dayshape_engine::ReshapeRequest;
use std::path::Path;

pub fn run(config: Option<&Path>, args: &ReshapeArgs) -> Result<()> {
    let session = Session::open(config, &args.common)?;
    let user = session.require_user()?;
    let clock = session.engine.clock()?;

    let request = ReshapeRequest::new(user)
        .dry_run(args.dry_run)
        .with_high_chaos_days(args.high_chaos_days);
    let report = session
        .engine
        .reshape(&session.repo, session.snapshot.as_ref(), &request, &clock);

    if args.common.json {
        print_json(&report)
    } else {
        print!("{}", render::reshape(Style::detect(), &report));
        Ok(())
    }
}
