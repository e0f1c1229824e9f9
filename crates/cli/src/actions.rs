//! Storage actions bound to the main menu
//!
//! Every action gathers its selections, issues exactly one mutation (bucket
//! deletion empties the bucket first) and then runs the optional
//! read-after-write check.

use crate::session::{Outcome, Session};
use s3menu_core::{bucket_name_from, validate_bucket_name, ObjectStore, Result, Terminal};
use std::io::{BufRead, Write};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Create a bucket named after the user plus a random suffix
pub fn create_bucket<I: BufRead, O: Write>(s: &mut Session<'_, I, O>) -> Result<Option<Outcome>> {
    let result = create_bucket_steps(s);
    s.conclude(result)
}

fn create_bucket_steps<I: BufRead, O: Write>(s: &mut Session<'_, I, O>) -> Result<Outcome> {
    let first_name = s.ask("Enter your first name: ")?;
    let last_name = s.ask("Enter your last name: ")?;

    let Some(bucket) = bucket_name_from(&first_name, &last_name, &mut rand::thread_rng()) else {
        return s.abort("No name detected.");
    };

    if let Err(err) = validate_bucket_name(&bucket) {
        return s.abort(&format!("'{}' is not a valid bucket name: {}.", bucket, err));
    }

    s.store().create_bucket(&bucket)?;

    let outcome = s.confirm("Bucket creation", |store| {
        Ok(store.list_buckets()?.contains(&bucket))
    })?;
    if outcome == Outcome::Completed {
        s.success(&format!("Bucket '{}' created successfully!\n", bucket))?;
    }
    Ok(outcome)
}

/// Upload a local file into a bucket, keyed by its file name
pub fn upload_object<I: BufRead, O: Write>(s: &mut Session<'_, I, O>) -> Result<Option<Outcome>> {
    let result = upload_object_steps(s);
    s.conclude(result)
}

fn upload_object_steps<I: BufRead, O: Write>(s: &mut Session<'_, I, O>) -> Result<Outcome> {
    let Some(bucket) = s.select_bucket("Which bucket would you like to upload the file to: ")?
    else {
        return s.abort("Invalid bucket.");
    };

    let answer = s.ask("What is the full path to the file you wish to upload: ")?;
    let file = PathBuf::from(answer.trim());
    let key = match file.file_name() {
        Some(name) if file.is_file() => name.to_string_lossy().into_owned(),
        _ => return s.abort(&format!("{} is not a valid file path.", file.display())),
    };

    s.store().upload_object(&bucket, &file, &key)?;

    let outcome = s.confirm("Upload", |store| {
        Ok(store.list_objects(&bucket)?.contains(&key))
    })?;
    if outcome == Outcome::Completed {
        s.success(&format!("{} has been uploaded to {}.", file.display(), bucket))?;
    }
    Ok(outcome)
}

/// Delete one object from a bucket
pub fn delete_object<I: BufRead, O: Write>(s: &mut Session<'_, I, O>) -> Result<Option<Outcome>> {
    let result = delete_object_steps(s);
    s.conclude(result)
}

fn delete_object_steps<I: BufRead, O: Write>(s: &mut Session<'_, I, O>) -> Result<Outcome> {
    let Some(bucket) = s.select_bucket("Which bucket would you like to delete the file from: ")?
    else {
        return s.abort("Invalid bucket.");
    };

    let Some(key) =
        s.select_object(&bucket, "Which object would you like to delete from the bucket: ")?
    else {
        return s.abort("Invalid object.");
    };

    s.store().delete_object(&bucket, &key)?;

    let outcome = s.confirm("Deletion", |store| {
        Ok(!store.list_objects(&bucket)?.contains(&key))
    })?;
    if outcome == Outcome::Completed {
        s.success(&format!("{} has been deleted from {}.", key, bucket))?;
    }
    Ok(outcome)
}

/// Empty a bucket and delete it
pub fn delete_bucket<I: BufRead, O: Write>(s: &mut Session<'_, I, O>) -> Result<Option<Outcome>> {
    let result = delete_bucket_steps(s);
    s.conclude(result)
}

fn delete_bucket_steps<I: BufRead, O: Write>(s: &mut Session<'_, I, O>) -> Result<Outcome> {
    let Some(bucket) = s.select_bucket("Which bucket would you like to delete: ")? else {
        return s.abort("Invalid bucket.");
    };

    empty_bucket(s.store(), &bucket)?;
    s.store().delete_bucket(&bucket)?;

    let outcome = s.confirm("Bucket deletion", |store| {
        Ok(!store.list_buckets()?.contains(&bucket))
    })?;
    if outcome == Outcome::Completed {
        s.success(&format!("{} has been deleted.", bucket))?;
    }
    Ok(outcome)
}

/// Delete every object of `bucket`, one at a time. Stops at the first error.
fn empty_bucket(store: &dyn ObjectStore, bucket: &str) -> Result<()> {
    let keys = store.list_objects(bucket)?;
    tracing::debug!(bucket, objects = keys.len(), "emptying bucket");

    for key in &keys {
        store.delete_object(bucket, key)?;
    }
    Ok(())
}

/// Copy an object into another bucket under the same key
pub fn copy_object<I: BufRead, O: Write>(s: &mut Session<'_, I, O>) -> Result<Option<Outcome>> {
    let result = copy_object_steps(s);
    s.conclude(result)
}

fn copy_object_steps<I: BufRead, O: Write>(s: &mut Session<'_, I, O>) -> Result<Outcome> {
    let Some(source) = s.select_bucket("Which bucket would you like to copy the file from: ")?
    else {
        return s.abort("Invalid bucket.");
    };

    let Some(key) =
        s.select_object(&source, "Which object would you like to copy from the bucket: ")?
    else {
        return s.abort("Invalid object.");
    };

    let Some(destination) = s.select_bucket("Which bucket would you like to copy the file to: ")?
    else {
        return s.abort("Invalid bucket.");
    };

    s.store().copy_object(&source, &key, &destination)?;

    let outcome = s.confirm("Copy", |store| {
        Ok(store.list_objects(&destination)?.contains(&key))
    })?;
    if outcome == Outcome::Completed {
        s.success(&format!(
            "{} has been copied from {} to {}.",
            key, source, destination
        ))?;
    }
    Ok(outcome)
}

/// Download an object into a local directory
pub fn download_object<I: BufRead, O: Write>(
    s: &mut Session<'_, I, O>,
) -> Result<Option<Outcome>> {
    let result = download_object_steps(s);
    s.conclude(result)
}

fn download_object_steps<I: BufRead, O: Write>(s: &mut Session<'_, I, O>) -> Result<Outcome> {
    let Some(bucket) = s.select_bucket("Which bucket would you like to download a file from: ")?
    else {
        return s.abort("Invalid bucket.");
    };

    let Some(key) =
        s.select_object(&bucket, "Which object would you like to download from the bucket: ")?
    else {
        return s.abort("Invalid object.");
    };

    let answer = s.ask("Enter the directory to save the file to: ")?;
    let directory = PathBuf::from(answer.trim());
    if answer.trim().is_empty() || !directory.is_dir() {
        return s.abort("Invalid save directory.");
    }

    let Some(file_name) = local_file_name(&key) else {
        return s.abort(&format!("{} has no file name to save under.", key));
    };
    let destination = directory.join(file_name);
    let previous = modified_at(&destination);

    s.store().download_object(&bucket, &key, &destination)?;

    // An existing file only counts once it has been rewritten.
    let outcome = s.confirm("Download", |_| {
        Ok(match (previous, modified_at(&destination)) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(before), Some(after)) => after > before,
        })
    })?;
    if outcome == Outcome::Completed {
        s.success(&format!(
            "{} has been downloaded from {} to {}.",
            key,
            bucket,
            destination.display()
        ))?;
    }
    Ok(outcome)
}

fn modified_at(path: &Path) -> Option<SystemTime> {
    fs::metadata(path)
        .ok()
        .filter(|meta| meta.is_file())
        .and_then(|meta| meta.modified().ok())
}

/// Last `/` separated segment of a key, if it is usable as a file name
fn local_file_name(key: &str) -> Option<&Path> {
    key.rsplit('/')
        .next()
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .map(Path::new)
}
