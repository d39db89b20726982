// src/pipeline.rs
//
// Stage sequencing for the daily crawl and the alert passes. Every stage is
// independently retryable: one bad record never aborts its batch, one dead
// channel never blocks the other, and a failed stage only costs this run.

use crate::config::Config;
use crate::db::connection::Database;
use crate::db::{alerts as alerts_db, hospitals as hospitals_db, notification_logs, prospects as prospects_db};
use crate::domain::alerts::{match_subscriptions, SubscriptionMatches};
use crate::domain::detector;
use crate::domain::prospect::{ProspectCandidate, StoredProspect};
use crate::errors::PipelineError;
use crate::notifier::Notifier;
use crate::registry::{BuildingRegistryClient, HospitalRegistryClient, Pacer};
use crate::scheduler::kst;
use chrono::{Duration as ChronoDuration, Utc};
use serde_json::json;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

// Runaway guard on pagination, not a throughput target; a region normally
// fits in a handful of pages.
const MAX_PAGES_PER_AREA: usize = 50;

const ALERT_WINDOW_HOURS: i64 = 1;
const DIGEST_WINDOW_HOURS: i64 = 24;
const ALERT_PROSPECT_CAP: usize = 100;

pub const ALERT_KIND: &str = "PROSPECT_ALERT";
pub const DIGEST_KIND: &str = "DAILY_DIGEST";

// Serializes overlapping triggers (manual run during a scheduled run); the
// loser logs and skips so the same 1-hour window is not dispatched twice.
static RUN_IN_PROGRESS: AtomicBool = AtomicBool::new(false);

struct RunGuard;

impl RunGuard {
    fn acquire() -> Option<RunGuard> {
        RUN_IN_PROGRESS
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| RunGuard)
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        RUN_IN_PROGRESS.store(false, Ordering::SeqCst);
    }
}

pub struct Pipeline {
    db: Database,
    hospitals: HospitalRegistryClient,
    buildings: BuildingRegistryClient,
    notifier: Notifier,
    pacer: Pacer,
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config, db: Database) -> Result<Self, PipelineError> {
        let hospitals = HospitalRegistryClient::new(&config.hospital_api_key)
            .map_err(|e| PipelineError::Config(e.to_string()))?;
        let buildings = BuildingRegistryClient::new(&config.building_api_key)
            .map_err(|e| PipelineError::Config(e.to_string()))?;
        let notifier = Notifier::new(&config.notify_api_base, &config.notify_api_key);
        let pacer = Pacer::new(config.fetch_delay);

        Ok(Self {
            db,
            hospitals,
            buildings,
            notifier,
            pacer,
            config,
        })
    }

    /// Full daily pipeline: hospital sync → closed detection → building sync
    /// → alert dispatch.
    pub fn run_full(&self) -> Result<(), PipelineError> {
        let _guard = match RunGuard::acquire() {
            Some(g) => g,
            None => {
                eprintln!("🔁 Run already in progress, skipping");
                return Ok(());
            }
        };

        println!("🏥 Hospital sync starting");
        let scan = self.scan_hospitals(true);
        let closed = detect_closed(&self.db, &scan)?;
        println!(
            "🏥 Hospital sync done ({} live, {} closed)",
            scan.live_ids.len(),
            closed
        );

        println!("🏗️ Building sync starting");
        let candidates = self.scan_buildings();
        println!("🏗️ Building sync done ({candidates} candidates)");

        dispatch_alerts(
            &self.db,
            &self.notifier,
            ALERT_WINDOW_HOURS,
            ALERT_KIND,
            false,
        )
    }

    /// Lighter 6-hourly pass: closed-hospital recheck plus alert dispatch.
    pub fn run_recheck(&self) -> Result<(), PipelineError> {
        let _guard = match RunGuard::acquire() {
            Some(g) => g,
            None => {
                eprintln!("🔁 Run already in progress, skipping");
                return Ok(());
            }
        };

        let scan = self.scan_hospitals(false);
        let closed = detect_closed(&self.db, &scan)?;
        println!("🏥 Recheck done ({} closed)", closed);

        dispatch_alerts(
            &self.db,
            &self.notifier,
            ALERT_WINDOW_HOURS,
            ALERT_KIND,
            false,
        )
    }

    /// Standard alert pass (`notify` without flags).
    pub fn run_alert_pass(&self) -> Result<(), PipelineError> {
        let _guard = match RunGuard::acquire() {
            Some(g) => g,
            None => {
                eprintln!("🔁 Run already in progress, skipping");
                return Ok(());
            }
        };
        dispatch_alerts(
            &self.db,
            &self.notifier,
            ALERT_WINDOW_HOURS,
            ALERT_KIND,
            false,
        )
    }

    /// Daily digest (`notify --digest`): 24h window, email only.
    pub fn run_digest(&self) -> Result<(), PipelineError> {
        let _guard = match RunGuard::acquire() {
            Some(g) => g,
            None => {
                eprintln!("🔁 Run already in progress, skipping");
                return Ok(());
            }
        };
        dispatch_alerts(
            &self.db,
            &self.notifier,
            DIGEST_WINDOW_HOURS,
            DIGEST_KIND,
            true,
        )
    }

    /// Walk every configured region page by page, collecting the live ykiho
    /// set. With `upsert_new` set, hospitals established within the trailing
    /// window are upserted as they stream past (each in its own error
    /// boundary). Strictly sequential; the pacer sleeps between calls.
    ///
    /// A failed page marks the whole scan incomplete: the live set is then
    /// partial and must not be diffed against, or every hospital in the
    /// failed region would read as closed.
    fn scan_hospitals(&self, upsert_new: bool) -> HospitalScan {
        let today = Utc::now().with_timezone(&kst()).date_naive();
        let mut live_ids = HashSet::new();
        let mut complete = true;

        for region in &self.config.hospital_regions {
            for page in 1..=MAX_PAGES_PER_AREA {
                let records = match self.hospitals.fetch_hospitals(
                    &region.sido_cd,
                    Some(region.sggu_cd.as_str()),
                    page,
                    self.config.page_size,
                ) {
                    Ok(records) => records,
                    Err(e) => {
                        eprintln!(
                            "⚠️ Hospital fetch failed (sido={} page={page}): {e} — scan incomplete",
                            region.sido_cd
                        );
                        complete = false;
                        break;
                    }
                };
                if records.is_empty() {
                    break;
                }

                live_ids.extend(
                    records
                        .iter()
                        .filter(|r| !r.ykiho.is_empty())
                        .map(|r| r.ykiho.clone()),
                );

                if upsert_new {
                    let now = Utc::now().naive_utc();
                    for record in detector::newly_established(&records, today) {
                        if let Err(e) = hospitals_db::upsert_hospital(&self.db, record, now) {
                            eprintln!("⚠️ Skipping hospital {}: {e}", record.ykiho);
                        }
                    }
                }

                let short_page = records.len() < self.config.page_size;
                if short_page {
                    break;
                }
                self.pacer.pause();
            }
            self.pacer.pause();
        }

        HospitalScan { live_ids, complete }
    }

    /// Walk every configured district, filter ledger entries through the
    /// candidate rules, and upsert NEW_BUILD prospects. Returns how many
    /// candidates were seen.
    fn scan_buildings(&self) -> usize {
        let today = Utc::now().with_timezone(&kst()).date_naive();
        let mut candidates = 0;

        for district in &self.config.building_districts {
            for page in 1..=MAX_PAGES_PER_AREA {
                let records = self.buildings.fetch_buildings(
                    &district.sigungu_cd,
                    &district.bjdong_cd,
                    page,
                    self.config.page_size,
                );
                if records.is_empty() {
                    break;
                }

                let now = Utc::now().naive_utc();
                for record in records.iter().filter(|r| detector::is_candidate_building(r, today)) {
                    candidates += 1;
                    let candidate = ProspectCandidate::from_building(record);
                    if let Err(e) = prospects_db::upsert_prospect(&self.db, &candidate, now) {
                        eprintln!("⚠️ Skipping building {}: {e}", candidate.source_key);
                    }
                }

                let short_page = records.len() < self.config.page_size;
                if short_page {
                    break;
                }
                self.pacer.pause();
            }
            self.pacer.pause();
        }

        candidates
    }
}

/// Outcome of one hospital scan: the live ykiho set plus whether every page
/// of every region actually came back. Only a complete scan is trustworthy
/// evidence of absence.
pub struct HospitalScan {
    pub live_ids: HashSet<String>,
    pub complete: bool,
}

/// Diff the persisted active set against the live scan: anything persisted
/// but absent from the registry is soft-deleted and becomes a VACANCY
/// prospect seeded from its last known snapshot. An incomplete or empty scan
/// skips detection entirely — a partial live set would mass-close every
/// hospital the failed region covers.
pub fn detect_closed(db: &Database, scan: &HospitalScan) -> Result<usize, PipelineError> {
    if !scan.complete {
        eprintln!("⚠️ Hospital scan incomplete, skipping closed detection");
        return Ok(0);
    }
    if scan.live_ids.is_empty() {
        eprintln!("⚠️ Empty live hospital set, skipping closed detection");
        return Ok(0);
    }

    let active = hospitals_db::active_hospital_map(db)?;
    let closed = detector::closed_hospitals(&active, &scan.live_ids);
    let mut marked = 0;

    for snapshot in closed {
        let now = Utc::now().naive_utc();
        // Persist the vacancy first; the hospital only retires once the
        // prospect exists, so a failed write leaves it eligible for
        // re-detection next run instead of vanishing without a trace.
        let candidate = ProspectCandidate::from_closed_hospital(snapshot);
        let result = prospects_db::upsert_prospect(db, &candidate, now)
            .and_then(|_| hospitals_db::mark_hospital_inactive(db, &snapshot.ykiho, now));
        match result {
            Ok(()) => marked += 1,
            Err(e) => eprintln!("⚠️ Skipping closed hospital {}: {e}", snapshot.ykiho),
        }
    }

    Ok(marked)
}

/// Load the recent-prospect window, evaluate every active subscription, and
/// fan out deliveries. Email and push are independent attempts; a delivery
/// failure is logged and swallowed — the next pass re-evaluates the same
/// window while the prospect stays NEW.
pub fn dispatch_alerts(
    db: &Database,
    notifier: &Notifier,
    window_hours: i64,
    kind: &str,
    email_only: bool,
) -> Result<(), PipelineError> {
    let now = Utc::now().naive_utc();
    let since = now - ChronoDuration::hours(window_hours);

    let prospects = prospects_db::recent_new_prospects(db, since, ALERT_PROSPECT_CAP)?;
    if prospects.is_empty() {
        println!("📭 No new prospects in the last {window_hours}h, nothing to send");
        return Ok(());
    }

    let subscriptions = alerts_db::active_subscriptions(db)?;
    let matched = match_subscriptions(&subscriptions, &prospects);
    println!(
        "🔔 {} prospects, {} subscriptions, {} with matches",
        prospects.len(),
        subscriptions.len(),
        matched.len()
    );

    for m in &matched {
        deliver_to_user(notifier, m, kind, email_only);

        if let Err(e) = notification_logs::insert_notification_log(
            db,
            m.subscription.user_id,
            kind,
            m.prospects.len(),
            now,
        ) {
            eprintln!(
                "⚠️ Failed to log notification for user {}: {e}",
                m.subscription.user_id
            );
        }
    }

    Ok(())
}

fn deliver_to_user(notifier: &Notifier, m: &SubscriptionMatches<'_>, kind: &str, email_only: bool) {
    let sub = m.subscription;
    let top = m.top();
    let count = m.prospects.len();

    let subject = format!(
        "신규 개원 후보 {count}건 — 최고 적합도 {}점 ({})",
        top.fit_score, top.address
    );
    let template = if kind == DIGEST_KIND {
        "daily_digest"
    } else {
        "prospect_alert"
    };
    let context = json!({
        "user_name": sub.user_name,
        "count": count,
        "top": prospect_json(top),
        "prospects": m.prospects.iter().map(|p| prospect_json(p)).collect::<Vec<_>>(),
    });

    if sub.email_enabled {
        match sub.email.as_deref() {
            Some(email) if !email.is_empty() => {
                if let Err(e) = notifier.send_email(email, &subject, template, &context) {
                    eprintln!("⚠️ Email to user {} failed: {e}", sub.user_id);
                }
            }
            _ => eprintln!("⚠️ User {} wants email but has no address", sub.user_id),
        }
    }

    if sub.push_enabled && !email_only {
        let body = if count > 1 {
            format!("{} 외 {}건 (적합도 {}점)", top.address, count - 1, top.fit_score)
        } else {
            format!("{} (적합도 {}점)", top.address, top.fit_score)
        };
        if let Err(e) = notifier.send_push(sub.user_id, "새 개원 후보", &body, &context) {
            eprintln!("⚠️ Push to user {} failed: {e}", sub.user_id);
        }
    }
}

fn prospect_json(p: &StoredProspect) -> serde_json::Value {
    json!({
        "source_key": p.source_key,
        "address": p.address,
        "kind": p.kind.as_str(),
        "fit_score": p.fit_score,
        "recommended_depts": p.recommended_depts,
        "previous_clinic": p.previous_clinic,
    })
}
